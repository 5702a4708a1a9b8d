//! Hex A* pathfinding, synchronous and as a background service
//!
//! The search itself runs over an immutable [`WalkSnapshot`] (per-tile
//! step costs copied out of the map), so the map can keep mutating while
//! workers search. Step cost is the cost of the tile being entered; all
//! costs are at least 1.0, which keeps the hex-distance heuristic
//! admissible and results optimal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::coords::AxialCoord;
use crate::map::WorldMap;

/// Extra cells kept around the start/goal bounding box so paths can bow
/// around local obstacles.
pub const SNAPSHOT_PADDING: i32 = 4;

/// Default expansion budget for service-submitted searches.
pub const DEFAULT_MAX_EXPANSIONS: usize = 20_000;

// =============================================================================
// SEARCH
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
    /// Ordered start-to-goal coordinates (both inclusive) and total cost.
    Found { path: Vec<AxialCoord>, cost: f32 },
    /// No walkable route exists within the snapshot.
    Unreachable,
    /// The expansion budget ran out before the goal was settled.
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug)]
pub struct PathQuery {
    pub start: AxialCoord,
    pub goal: AxialCoord,
    pub max_expansions: Option<usize>,
}

/// Immutable view of walkable terrain: coordinate to entry cost.
#[derive(Clone, Debug)]
pub struct WalkSnapshot {
    costs: HashMap<AxialCoord, f32>,
}

impl WalkSnapshot {
    /// Snapshot every walkable tile in the map.
    pub fn from_map(map: &WorldMap) -> Self {
        let costs = map
            .tiles()
            .filter_map(|t| t.move_cost().map(|c| (t.coord, c)))
            .collect();
        Self { costs }
    }

    /// Snapshot only the padded bounding box around start and goal. Keeps
    /// per-request copies small on large maps.
    pub fn around(map: &WorldMap, start: AxialCoord, goal: AxialCoord) -> Self {
        let q_lo = start.q.min(goal.q) - SNAPSHOT_PADDING;
        let q_hi = start.q.max(goal.q) + SNAPSHOT_PADDING;
        let r_lo = start.r.min(goal.r) - SNAPSHOT_PADDING;
        let r_hi = start.r.max(goal.r) + SNAPSHOT_PADDING;

        let costs = map
            .tiles()
            .filter(|t| {
                t.coord.q >= q_lo && t.coord.q <= q_hi && t.coord.r >= r_lo && t.coord.r <= r_hi
            })
            .filter_map(|t| t.move_cost().map(|c| (t.coord, c)))
            .collect();
        Self { costs }
    }

    pub fn cost(&self, coord: AxialCoord) -> Option<f32> {
        self.costs.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Open-set entry ordered for a min-heap on f-score.
#[derive(Clone, Copy, Debug, PartialEq)]
struct OpenEntry {
    coord: AxialCoord,
    g: f32,
    f: f32,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lowest f-score first.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over a walk snapshot. Returns `Unreachable` when start or goal is
/// missing from the snapshot (off-map or unwalkable terrain).
pub fn find_path(snapshot: &WalkSnapshot, query: &PathQuery) -> PathOutcome {
    if snapshot.cost(query.start).is_none() || snapshot.cost(query.goal).is_none() {
        return PathOutcome::Unreachable;
    }
    if query.start == query.goal {
        return PathOutcome::Found {
            path: vec![query.start],
            cost: 0.0,
        };
    }

    let budget = query.max_expansions.unwrap_or(usize::MAX);

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<AxialCoord, f32> = HashMap::new();
    let mut came_from: HashMap<AxialCoord, AxialCoord> = HashMap::new();

    g_score.insert(query.start, 0.0);
    open.push(OpenEntry {
        coord: query.start,
        g: 0.0,
        f: query.start.distance(&query.goal) as f32,
    });

    let mut expansions = 0usize;

    while let Some(entry) = open.pop() {
        // Stale heap entry for a node already reached more cheaply.
        if entry.g > g_score.get(&entry.coord).copied().unwrap_or(f32::INFINITY) {
            continue;
        }

        if entry.coord == query.goal {
            return PathOutcome::Found {
                path: reconstruct(&came_from, query.goal),
                cost: entry.g,
            };
        }

        expansions += 1;
        if expansions > budget {
            return PathOutcome::BudgetExhausted;
        }

        for neighbor in entry.coord.neighbors() {
            let step = match snapshot.cost(neighbor) {
                Some(c) => c,
                None => continue,
            };
            let tentative = entry.g + step;
            if tentative < g_score.get(&neighbor).copied().unwrap_or(f32::INFINITY) {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, entry.coord);
                open.push(OpenEntry {
                    coord: neighbor,
                    g: tentative,
                    f: tentative + neighbor.distance(&query.goal) as f32,
                });
            }
        }
    }

    PathOutcome::Unreachable
}

/// Convenience wrapper that snapshots the whole map first.
pub fn find_path_on_map(map: &WorldMap, query: &PathQuery) -> PathOutcome {
    find_path(&WalkSnapshot::from_map(map), query)
}

fn reconstruct(came_from: &HashMap<AxialCoord, AxialCoord>, goal: AxialCoord) -> Vec<AxialCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

// =============================================================================
// BACKGROUND SERVICE
// =============================================================================

pub type MoverId = u64;

struct PathJob {
    request_id: u64,
    mover: MoverId,
    generation: u64,
    snapshot: WalkSnapshot,
    query: PathQuery,
}

/// A completed search, tagged with the request that produced it.
#[derive(Clone, Debug)]
pub struct PathResponse {
    pub request_id: u64,
    pub mover: MoverId,
    pub outcome: PathOutcome,
    generation: u64,
}

/// Worker-pool pathfinding front end. Each submit copies a snapshot and
/// queues it; results come back through [`poll`](Self::poll). A new
/// request for a mover supersedes its older in-flight ones, whose results
/// are dropped on receipt.
pub struct PathService {
    job_tx: Option<Sender<PathJob>>,
    result_rx: Receiver<PathResponse>,
    workers: Vec<thread::JoinHandle<()>>,
    next_request: u64,
    generations: HashMap<MoverId, u64>,
}

impl PathService {
    pub fn new(worker_count: usize) -> Self {
        let (job_tx, job_rx) = unbounded::<PathJob>();
        let (result_tx, result_rx) = unbounded::<PathResponse>();

        let workers = (0..worker_count.max(1))
            .map(|_| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                thread::spawn(move || {
                    // Loop ends when the service drops its sender.
                    while let Ok(job) = job_rx.recv() {
                        let outcome = find_path(&job.snapshot, &job.query);
                        let response = PathResponse {
                            request_id: job.request_id,
                            mover: job.mover,
                            outcome,
                            generation: job.generation,
                        };
                        if result_tx.send(response).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            result_rx,
            workers,
            next_request: 0,
            generations: HashMap::new(),
        }
    }

    /// Queue a search for a mover and return its request id. Any earlier
    /// request for the same mover becomes stale.
    pub fn submit(
        &mut self,
        map: &WorldMap,
        mover: MoverId,
        start: AxialCoord,
        goal: AxialCoord,
        max_expansions: Option<usize>,
    ) -> u64 {
        self.next_request += 1;
        let request_id = self.next_request;

        let generation = self.generations.entry(mover).or_insert(0);
        *generation += 1;

        let job = PathJob {
            request_id,
            mover,
            generation: *generation,
            snapshot: WalkSnapshot::around(map, start, goal),
            query: PathQuery {
                start,
                goal,
                max_expansions: Some(max_expansions.unwrap_or(DEFAULT_MAX_EXPANSIONS)),
            },
        };

        if let Some(tx) = &self.job_tx {
            if tx.send(job).is_err() {
                log::warn!("path workers gone, request {} dropped", request_id);
            }
        }

        request_id
    }

    fn is_current(&self, response: &PathResponse) -> bool {
        self.generations
            .get(&response.mover)
            .map(|&g| g == response.generation)
            .unwrap_or(false)
    }

    /// Drain every finished search, discarding superseded results.
    pub fn poll(&mut self) -> Vec<PathResponse> {
        let mut out = Vec::new();
        while let Ok(response) = self.result_rx.try_recv() {
            if self.is_current(&response) {
                out.push(response);
            } else {
                log::trace!("dropping stale path result {}", response.request_id);
            }
        }
        out
    }

    /// Block until the next non-stale result arrives. `None` once all
    /// workers have exited.
    pub fn recv_blocking(&mut self) -> Option<PathResponse> {
        while let Ok(response) = self.result_rx.recv() {
            if self.is_current(&response) {
                return Some(response);
            }
        }
        None
    }
}

impl Drop for PathService {
    fn drop(&mut self) {
        // Closing the job channel lets workers finish their queue and exit.
        self.job_tx.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::map::Tile;

    fn flat_map(radius: i32, biome: Biome) -> WorldMap {
        let mut map = WorldMap::new(radius as u32 * 2, radius as u32 * 2, 0);
        for coord in AxialCoord::ORIGIN.within_radius(radius) {
            map.insert_tile(Tile::new(coord, biome, 0.5, 0.5, 0.5, 0.5));
        }
        map
    }

    fn query(start: AxialCoord, goal: AxialCoord) -> PathQuery {
        PathQuery {
            start,
            goal,
            max_expansions: None,
        }
    }

    #[test]
    fn test_straight_line_on_uniform_terrain() {
        let map = flat_map(6, Biome::Plains);
        let start = AxialCoord::new(-4, 0);
        let goal = AxialCoord::new(4, 0);
        match find_path_on_map(&map, &query(start, goal)) {
            PathOutcome::Found { path, cost } => {
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
                assert_eq!(path.len() as i32, start.distance(&goal) + 1);
                assert!((cost - start.distance(&goal) as f32).abs() < 1e-5);
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let map = flat_map(3, Biome::Plains);
        let c = AxialCoord::new(1, 1);
        assert_eq!(
            find_path_on_map(&map, &query(c, c)),
            PathOutcome::Found {
                path: vec![c],
                cost: 0.0
            }
        );
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut map = flat_map(6, Biome::Plains);
        let goal = AxialCoord::new(3, 0);
        // Wall the goal off with impassable peaks.
        for coord in goal.ring(1) {
            map.insert_tile(Tile::new(coord, Biome::SnowyPeaks, 0.95, 0.5, 0.2, 0.5));
        }
        assert_eq!(
            find_path_on_map(&map, &query(AxialCoord::new(-4, 0), goal)),
            PathOutcome::Unreachable
        );
    }

    #[test]
    fn test_unwalkable_start_is_unreachable() {
        let map = flat_map(4, Biome::Ocean);
        assert_eq!(
            find_path_on_map(&map, &query(AxialCoord::ORIGIN, AxialCoord::new(2, 0))),
            PathOutcome::Unreachable
        );
    }

    #[test]
    fn test_budget_exhaustion() {
        let map = flat_map(10, Biome::Plains);
        let q = PathQuery {
            start: AxialCoord::new(-9, 0),
            goal: AxialCoord::new(9, 0),
            max_expansions: Some(3),
        };
        assert_eq!(find_path_on_map(&map, &q), PathOutcome::BudgetExhausted);
    }

    #[test]
    fn test_cheaper_detour_beats_direct_route() {
        // One expensive mountain on the straight line. The only length-2
        // route passes through it at cost 4.0; the 3-step plains detour
        // wins at cost 3.0.
        let mut map = flat_map(5, Biome::Plains);
        let obstacle = AxialCoord::new(1, 0);
        map.insert_tile(Tile::new(obstacle, Biome::Mountain, 0.8, 0.4, 0.4, 0.5));

        let start = AxialCoord::new(0, 0);
        let goal = AxialCoord::new(2, 0);
        match find_path_on_map(&map, &query(start, goal)) {
            PathOutcome::Found { path, cost } => {
                assert!((cost - 3.0).abs() < 1e-5, "expected cost 3.0, got {}", cost);
                assert_eq!(path.len(), 4);
                assert!(!path.contains(&obstacle));
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_service_round_trip() {
        let map = flat_map(5, Biome::Plains);
        let mut service = PathService::new(1);
        let id = service.submit(&map, 1, AxialCoord::new(-3, 0), AxialCoord::new(3, 0), None);
        let response = service.recv_blocking().unwrap();
        assert_eq!(response.request_id, id);
        assert_eq!(response.mover, 1);
        assert!(matches!(response.outcome, PathOutcome::Found { .. }));
    }

    #[test]
    fn test_stale_results_dropped() {
        let map = flat_map(5, Biome::Plains);
        let mut service = PathService::new(1);
        let _old = service.submit(&map, 7, AxialCoord::new(-3, 0), AxialCoord::new(3, 0), None);
        let new = service.submit(&map, 7, AxialCoord::new(-3, 0), AxialCoord::new(0, 2), None);

        // Single worker processes jobs in order; the first result is stale
        // and must be skipped.
        let response = service.recv_blocking().unwrap();
        assert_eq!(response.request_id, new);
    }
}
