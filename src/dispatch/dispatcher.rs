//! In-memory dispatch engine.

use std::collections::{BTreeMap, HashMap, HashSet};

use jiff::{SignedDuration, Timestamp};
use tracing::{debug, info, warn};

use super::error::DispatchError;
use super::records::{total_cost, CompletedTask, TaskQuote};
use crate::assignment::{select_packages, Candidate};
use crate::config::DispatchConfig;
use crate::distance::{DistanceEdge, DistanceEdges, GeoPoint};
use crate::models::{
    LocationNode, LocationRegistry, NodeId, NodeKind, Package, PackageId, PackageStatus, Route,
    RouteId, RouteStatus, StatusError, Task, TaskId, TaskKind, TaskStatus, Vehicle, VehicleId,
    VehicleStatus,
};
use crate::planner::{shortest_path, Algorithm, Coordinates, EdgeMetric, Graph};
use crate::pricing::{CostQuery, SharedCostModel};
use crate::scheduling::{PriorityScheduler, ScheduleError};

/// Owns vehicles, packages and routes, and drives them through planning,
/// execution and pricing.
///
/// Every mutating operation takes `&mut self`, so a dispatcher has a single
/// writer. The cost model is shared and may be retrained from another
/// thread through a clone of [`cost_model`](Self::cost_model).
///
/// # Examples
///
/// ```
/// use jiff::Timestamp;
/// use u_dispatch::config::DispatchConfig;
/// use u_dispatch::dispatch::Dispatcher;
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{Package, PackageId, Site, Vehicle, VehicleId};
/// use u_dispatch::planner::Algorithm;
///
/// let now = Timestamp::UNIX_EPOCH;
/// let mut dispatcher = Dispatcher::new(DispatchConfig::default());
/// dispatcher.add_vehicle(Vehicle::new(VehicleId::new(1), 10, GeoPoint::new(37.50, 127.00)));
/// dispatcher.add_package(Package::new(
///     PackageId::new(1),
///     4,
///     Site::new(100, GeoPoint::new(37.51, 127.01)),
///     Site::new(200, GeoPoint::new(37.60, 127.10)),
/// ));
///
/// let route = dispatcher.plan_route(VehicleId::new(1), Algorithm::AStar, now).unwrap();
/// let first = dispatcher.route(route).unwrap().top_pending().unwrap().id();
/// let quote = dispatcher.start_task(route, first, now).unwrap();
/// assert!(quote.cost_per_section >= 200.0);
/// let done = dispatcher.complete_task(route, first, 4, now).unwrap();
/// assert_eq!(done.vehicle_used, 4);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: DispatchConfig,
    scheduler: PriorityScheduler,
    locations: LocationRegistry,
    edges: DistanceEdges,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    packages: BTreeMap<PackageId, Package>,
    routes: BTreeMap<RouteId, Route>,
    quotes: HashMap<TaskId, TaskQuote>,
    cost_model: SharedCostModel,
    next_route: u64,
    next_task: u64,
}

impl Dispatcher {
    /// Creates an empty dispatcher with an untrained cost model.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            scheduler: PriorityScheduler::new(config.priority),
            locations: LocationRegistry::new(),
            edges: DistanceEdges::new(),
            vehicles: BTreeMap::new(),
            packages: BTreeMap::new(),
            routes: BTreeMap::new(),
            quotes: HashMap::new(),
            cost_model: SharedCostModel::default(),
            next_route: 1,
            next_task: 1,
        }
    }

    /// Uses an existing cost model handle.
    pub fn with_cost_model(mut self, cost_model: SharedCostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Registers or replaces a vehicle.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id(), vehicle);
    }

    /// Registers or replaces a package.
    pub fn add_package(&mut self, package: Package) {
        self.packages.insert(package.id(), package);
    }

    /// Registers a location node, returning the existing one if known.
    pub fn register_location(
        &mut self,
        kind: NodeKind,
        reference_id: u64,
        point: GeoPoint,
    ) -> NodeId {
        self.locations.ensure(kind, reference_id, point)
    }

    /// Records a measured edge that overrides the great-circle estimate.
    pub fn insert_edge(&mut self, from: NodeId, to: NodeId, edge: DistanceEdge) {
        self.edges.insert(from, to, edge);
    }

    /// Configuration in use.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Shared cost model handle.
    pub fn cost_model(&self) -> &SharedCostModel {
        &self.cost_model
    }

    /// Known location nodes.
    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Looks up a vehicle.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Looks up a package.
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    /// Looks up a route.
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    /// All routes in creation order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Number of routes with work left (pending or in-progress tasks).
    pub fn active_demand(&self) -> u32 {
        let active = self
            .routes
            .values()
            .filter(|r| r.tasks().iter().any(|t| t.status() != TaskStatus::Completed))
            .count();
        u32::try_from(active).unwrap_or(u32::MAX)
    }

    /// Plans a new route for a vehicle from the currently available packages.
    ///
    /// Packages are chosen greedily by proximity within the vehicle's free
    /// sections. Each gets a pickup and a delivery task, ordered by
    /// simulating the load change of every task from the vehicle's current
    /// fill. Planned distance and time chain shortest paths with
    /// `algorithm` through the tasks in that order.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownVehicle`], [`DispatchError::VehicleBusy`]
    /// while the vehicle has a route that is not completed,
    /// [`DispatchError::NoCapacity`], [`DispatchError::NoPackages`] or
    /// [`DispatchError::NothingFits`].
    pub fn plan_route(
        &mut self,
        vehicle_id: VehicleId,
        algorithm: Algorithm,
        now: Timestamp,
    ) -> Result<RouteId, DispatchError> {
        let vehicle = self
            .vehicles
            .get(&vehicle_id)
            .ok_or(DispatchError::UnknownVehicle(vehicle_id))?;
        if let Some(open) = self.open_route(vehicle_id) {
            return Err(DispatchError::VehicleBusy {
                vehicle: vehicle_id,
                route: open,
            });
        }
        let available = vehicle.available();
        if available == 0 {
            return Err(DispatchError::NoCapacity(vehicle_id));
        }
        let location = vehicle.location();
        let capacity = vehicle.capacity();

        let candidates: Vec<Candidate> = self
            .packages
            .values()
            .filter(|p| p.status() == PackageStatus::Available)
            .map(Candidate::from)
            .collect();
        if candidates.is_empty() {
            return Err(DispatchError::NoPackages);
        }
        let selection = select_packages(&candidates, &location, available);
        if selection.is_empty() {
            return Err(DispatchError::NothingFits {
                vehicle: vehicle_id,
                available,
            });
        }

        let chosen: Vec<Package> = selection
            .package_ids()
            .iter()
            .filter_map(|id| self.packages.get(id).cloned())
            .collect();
        let mut tasks = Vec::with_capacity(chosen.len() * 2);
        for package in &chosen {
            let producer = package.producer();
            let destination = package.destination();
            let pickup_node =
                self.locations
                    .ensure(NodeKind::Producer, producer.reference_id, producer.point);
            let delivery_node =
                self.locations
                    .ensure(NodeKind::Destination, destination.reference_id, destination.point);
            tasks.push(Task::pickup(self.allocate_task(), package, pickup_node));
            tasks.push(Task::delivery(self.allocate_task(), package, delivery_node));
        }

        let planned = self.scheduler.plan(&tasks, &location, capacity, now);
        let ordered = pickups_first(planned);

        let route_id = RouteId::new(self.next_route);
        self.next_route += 1;
        let start = self
            .locations
            .ensure(NodeKind::RouteStart, route_id.get(), location);
        let (distance_km, minutes) = self.planned_totals(start, &ordered, algorithm);

        let mut route = Route::new(route_id, vehicle_id, algorithm);
        for task in ordered {
            route.push_task(task);
        }
        route.set_planned_totals(distance_km, minutes);

        for package in &chosen {
            if let Some(p) = self.packages.get_mut(&package.id()) {
                p.advance(PackageStatus::Requested)?;
            }
        }
        if let Some(v) = self.vehicles.get_mut(&vehicle_id) {
            v.set_status(VehicleStatus::Active);
        }

        info!(
            route = %route_id,
            vehicle = %vehicle_id,
            ?algorithm,
            packages = chosen.len(),
            sections = selection.used_capacity,
            distance_km,
            minutes,
            "route planned"
        );
        self.routes.insert(route_id, route);
        Ok(route_id)
    }

    /// Starts the rank-1 pending task of a route and prices it.
    ///
    /// The price uses the producer to destination distance of the task's
    /// package and the number of routes with work left. The completion
    /// estimate drives that distance at the configured average speed plus
    /// the configured buffer.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownRoute`], or [`DispatchError::Schedule`] when
    /// the task is unknown, not pending, or not the rank-1 task.
    pub fn start_task(
        &mut self,
        route_id: RouteId,
        task_id: TaskId,
        now: Timestamp,
    ) -> Result<TaskQuote, DispatchError> {
        let demand = self.active_demand();
        let route = self
            .routes
            .get_mut(&route_id)
            .ok_or(DispatchError::UnknownRoute(route_id))?;
        let task = match route.start_task(task_id) {
            Ok(task) => task.clone(),
            Err(err) => {
                warn!(route = %route_id, task = %task_id, error = %err, "task start rejected");
                return Err(err.into());
            }
        };

        let distance_km = task
            .package()
            .and_then(|id| self.packages.get(&id))
            .map_or(0.0, |p| self.haul_km(p));
        let mut query = CostQuery::new(distance_km, demand);
        query.deadline = task.deadline();
        let at = now.to_zoned(self.cost_model.time_zone());
        let cost_per_section = self.cost_model.predict_at(&query, &at);

        let quote = TaskQuote {
            route: route_id,
            task: task_id,
            package: task.package(),
            cost_per_section,
            distance_km,
            demand,
            started_at: now,
            estimated_completion: self.estimate_completion(distance_km, now),
        };
        debug!(
            route = %route_id,
            task = %task_id,
            cost_per_section,
            distance_km,
            demand,
            "task started"
        );
        self.quotes.insert(task_id, quote);
        Ok(quote)
    }

    /// Confirms a started task.
    ///
    /// A pickup loads `sections_used` onto the vehicle and marks the package
    /// loaded; a delivery unloads them and marks it delivered. The vehicle
    /// moves to the task's location and the remaining tasks are re-ranked
    /// for the new position and fill. Completing the last task completes the
    /// route and idles the vehicle.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownRoute`], [`DispatchError::Schedule`] if the
    /// task is not in progress, [`DispatchError::Capacity`] if the load
    /// change does not fit, [`DispatchError::Status`] if the package cannot
    /// take the new status. Nothing changes on error.
    pub fn complete_task(
        &mut self,
        route_id: RouteId,
        task_id: TaskId,
        sections_used: u32,
        now: Timestamp,
    ) -> Result<CompletedTask, DispatchError> {
        let route = self
            .routes
            .get(&route_id)
            .ok_or(DispatchError::UnknownRoute(route_id))?;
        let task = route
            .task(task_id)
            .ok_or(ScheduleError::UnknownTask(task_id))?
            .clone();
        if task.status() != TaskStatus::InProgress {
            return Err(ScheduleError::InvalidTransition {
                task: task_id,
                from: task.status(),
                to: TaskStatus::Completed,
            }
            .into());
        }
        let vehicle_id = route.vehicle_id();

        let next_status = match task.kind() {
            TaskKind::Pickup => PackageStatus::Loaded,
            TaskKind::Delivery => PackageStatus::Delivered,
        };
        if let Some(package) = task.package().and_then(|id| self.packages.get(&id)) {
            if !package.status().can_transition_to(next_status) {
                return Err(StatusError {
                    package: package.id(),
                    from: package.status(),
                    to: next_status,
                }
                .into());
            }
        }

        let vehicle = self
            .vehicles
            .get_mut(&vehicle_id)
            .ok_or(DispatchError::UnknownVehicle(vehicle_id))?;
        match task.kind() {
            TaskKind::Pickup => vehicle.load(sections_used)?,
            TaskKind::Delivery => vehicle.unload(sections_used)?,
        }
        vehicle.move_to(task.point());
        let location = vehicle.location();
        let capacity = vehicle.capacity();
        let vehicle_used = vehicle.used();

        if let Some(package) = task.package().and_then(|id| self.packages.get_mut(&id)) {
            package.advance(next_status)?;
        }

        let route = self
            .routes
            .get_mut(&route_id)
            .ok_or(DispatchError::UnknownRoute(route_id))?;
        route.complete_task(task_id)?;

        let pending: Vec<Task> = route.pending_tasks().into_iter().cloned().collect();
        let reordered = pickups_first(self.scheduler.reorder(&pending, &location, &capacity, now));
        route.apply_order(&reordered);
        let remaining: Vec<TaskId> = reordered.iter().map(Task::id).collect();

        let route_completed = route.status() == RouteStatus::Completed;
        if route_completed {
            if let Some(v) = self.vehicles.get_mut(&vehicle_id) {
                v.set_status(VehicleStatus::Idle);
            }
            info!(route = %route_id, vehicle = %vehicle_id, "route completed");
        }

        let (cost_per_section, distance_km) = match self.quotes.remove(&task_id) {
            Some(quote) => (quote.cost_per_section, quote.distance_km),
            None => {
                let distance_km = task
                    .package()
                    .and_then(|id| self.packages.get(&id))
                    .map_or(0.0, |p| self.haul_km(p));
                let query = CostQuery::new(distance_km, self.active_demand());
                let at = now.to_zoned(self.cost_model.time_zone());
                (self.cost_model.predict_at(&query, &at), distance_km)
            }
        };

        let completed = CompletedTask {
            route: route_id,
            task: task_id,
            kind: task.kind(),
            package: task.package(),
            sections: sections_used,
            cost_per_section,
            total_cost: total_cost(cost_per_section, sections_used, distance_km),
            completed_at: now,
            vehicle_used,
            remaining,
            route_completed,
        };
        debug!(
            route = %route_id,
            task = %task_id,
            total_cost = completed.total_cost,
            remaining = completed.remaining.len(),
            "task completed"
        );
        Ok(completed)
    }

    fn allocate_task(&mut self) -> TaskId {
        let id = TaskId::new(self.next_task);
        self.next_task += 1;
        id
    }

    /// The vehicle's route that still has work left, if any.
    fn open_route(&self, vehicle_id: VehicleId) -> Option<RouteId> {
        self.routes
            .values()
            .find(|r| r.vehicle_id() == vehicle_id && r.status() != RouteStatus::Completed)
            .map(Route::id)
    }

    /// Producer to destination distance, preferring a measured edge.
    fn haul_km(&self, package: &Package) -> f64 {
        let producer = self
            .locations
            .find(NodeKind::Producer, package.producer().reference_id);
        let destination = self
            .locations
            .find(NodeKind::Destination, package.destination().reference_id);
        match (producer, destination) {
            (Some(from), Some(to)) => self
                .edges
                .get(from, to)
                .map_or_else(|| package.haul_km(), |edge| edge.distance_km),
            _ => package.haul_km(),
        }
    }

    fn estimate_completion(&self, distance_km: f64, now: Timestamp) -> Timestamp {
        let hours =
            distance_km / self.config.average_speed_kmh * (1.0 + self.config.estimate_buffer);
        SignedDuration::try_from_secs_f64(hours * 3600.0)
            .ok()
            .and_then(|travel| now.checked_add(travel).ok())
            .unwrap_or(now)
    }

    /// Total kilometers and minutes along `tasks` starting at `start`.
    ///
    /// Paths are searched over the route's own stops.
    fn planned_totals(&self, start: NodeId, tasks: &[Task], algorithm: Algorithm) -> (f64, f64) {
        let mut stops: Vec<LocationNode> = Vec::with_capacity(tasks.len() + 1);
        for id in std::iter::once(start).chain(tasks.iter().map(Task::node)) {
            if stops.iter().any(|n| n.id() == id) {
                continue;
            }
            if let Some(node) = self.locations.get(id) {
                stops.push(node.clone());
            }
        }

        let speed = self.config.planning_speed_kmh;
        let km_graph = Graph::from_nodes(&stops, &self.edges, EdgeMetric::DistanceKm, speed);
        let minutes_graph =
            Graph::from_nodes(&stops, &self.edges, EdgeMetric::TravelMinutes, speed);
        let coords: Coordinates = stops.iter().map(|n| (n.id(), n.point())).collect();

        let mut distance_km = 0.0;
        let mut minutes = 0.0;
        let mut from = start;
        for task in tasks {
            let to = task.node();
            let km = shortest_path(&km_graph, from, to, Some(&coords), algorithm);
            let min = shortest_path(&minutes_graph, from, to, Some(&coords), algorithm);
            match (km, min) {
                (Some(km), Some(min)) => {
                    distance_km += km.cost;
                    minutes += min.cost;
                }
                _ => warn!(%from, %to, "no path between route stops"),
            }
            from = to;
        }
        (distance_km, minutes)
    }
}

/// Moves each delivery directly behind its package's pickup when the pickup
/// would otherwise come later, then renumbers `priority_order` to `1..=n`.
///
/// Deliveries whose pickup is not in `tasks` keep their position.
fn pickups_first(tasks: Vec<Task>) -> Vec<Task> {
    let pickups: HashSet<PackageId> = tasks
        .iter()
        .filter(|t| t.kind() == TaskKind::Pickup)
        .filter_map(Task::package)
        .collect();

    let mut held: HashMap<PackageId, Task> = HashMap::new();
    let mut seen: HashSet<PackageId> = HashSet::new();
    let mut ordered = Vec::with_capacity(tasks.len());
    for task in tasks {
        match (task.kind(), task.package()) {
            (TaskKind::Delivery, Some(pkg)) if pickups.contains(&pkg) && !seen.contains(&pkg) => {
                held.insert(pkg, task);
            }
            (TaskKind::Pickup, Some(pkg)) => {
                seen.insert(pkg);
                ordered.push(task);
                if let Some(delivery) = held.remove(&pkg) {
                    ordered.push(delivery);
                }
            }
            _ => ordered.push(task),
        }
    }

    for (task, order) in ordered.iter_mut().zip(1u32..) {
        task.set_priority_order(order);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Site;

    fn now() -> Timestamp {
        "2026-03-03T12:00:00Z".parse().expect("valid timestamp")
    }

    fn package(id: u64, sections: u32, producer_lon: f64, dest_lon: f64) -> Package {
        Package::new(
            PackageId::new(id),
            sections,
            Site::new(id, GeoPoint::new(0.0, producer_lon)),
            Site::new(1000 + id, GeoPoint::new(0.0, dest_lon)),
        )
    }

    fn dispatcher() -> Dispatcher {
        let mut d = Dispatcher::new(DispatchConfig::default());
        d.add_vehicle(Vehicle::new(VehicleId::new(1), 10, GeoPoint::new(0.0, 0.0)));
        d
    }

    fn run_to_end(d: &mut Dispatcher, route: RouteId) -> Vec<CompletedTask> {
        let mut done = Vec::new();
        while let Some(task) = d.route(route).and_then(Route::top_pending).cloned() {
            d.start_task(route, task.id(), now()).expect("top task starts");
            done.push(
                d.complete_task(route, task.id(), task.required_sections(), now())
                    .expect("task completes"),
            );
        }
        done
    }

    #[test]
    fn test_plan_unknown_vehicle() {
        let mut d = dispatcher();
        assert_eq!(
            d.plan_route(VehicleId::new(9), Algorithm::AStar, now()),
            Err(DispatchError::UnknownVehicle(VehicleId::new(9)))
        );
    }

    #[test]
    fn test_plan_without_packages() {
        let mut d = dispatcher();
        assert_eq!(
            d.plan_route(VehicleId::new(1), Algorithm::AStar, now()),
            Err(DispatchError::NoPackages)
        );
    }

    #[test]
    fn test_plan_full_vehicle() {
        let mut d = Dispatcher::new(DispatchConfig::default());
        let full = Vehicle::new(VehicleId::new(1), 5, GeoPoint::new(0.0, 0.0))
            .with_load(5)
            .expect("fits");
        d.add_vehicle(full);
        d.add_package(package(1, 1, 0.1, 0.2));
        assert_eq!(
            d.plan_route(VehicleId::new(1), Algorithm::AStar, now()),
            Err(DispatchError::NoCapacity(VehicleId::new(1)))
        );
    }

    #[test]
    fn test_plan_nothing_fits() {
        let mut d = dispatcher();
        d.add_package(package(1, 11, 0.1, 0.2));
        assert_eq!(
            d.plan_route(VehicleId::new(1), Algorithm::AStar, now()),
            Err(DispatchError::NothingFits {
                vehicle: VehicleId::new(1),
                available: 10,
            })
        );
        assert_eq!(
            d.package(PackageId::new(1)).map(Package::status),
            Some(PackageStatus::Available)
        );
    }

    #[test]
    fn test_plan_selects_within_capacity() {
        let mut d = dispatcher();
        d.add_package(package(1, 4, 0.01, 0.5));
        d.add_package(package(2, 4, 0.02, 0.5));
        d.add_package(package(3, 4, 0.03, 0.5));
        let route_id = d
            .plan_route(VehicleId::new(1), Algorithm::Dijkstra, now())
            .expect("planned");

        let route = d.route(route_id).expect("route exists");
        assert_eq!(route.len(), 4);
        assert_eq!(route.status(), RouteStatus::Planned);
        assert_eq!(route.algorithm(), Algorithm::Dijkstra);
        let mut orders: Vec<u32> = route.tasks().iter().map(Task::priority_order).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![1, 2, 3, 4]);

        let status = |id| d.package(PackageId::new(id)).map(Package::status);
        assert_eq!(status(1), Some(PackageStatus::Requested));
        assert_eq!(status(2), Some(PackageStatus::Requested));
        assert_eq!(status(3), Some(PackageStatus::Available));
        assert_eq!(
            d.vehicle(VehicleId::new(1)).map(Vehicle::status),
            Some(VehicleStatus::Active)
        );
        // Route start, two producers, two destinations.
        assert_eq!(d.locations().len(), 5);
    }

    #[test]
    fn test_plan_rejects_busy_vehicle() {
        let mut d = dispatcher();
        d.add_package(package(1, 8, 0.1, 0.4));
        d.add_package(package(2, 8, 0.2, 0.4));
        let first = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        assert_eq!(
            d.plan_route(VehicleId::new(1), Algorithm::AStar, now()),
            Err(DispatchError::VehicleBusy {
                vehicle: VehicleId::new(1),
                route: first,
            })
        );
        assert_eq!(d.active_demand(), 1);

        run_to_end(&mut d, first);
        let second = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        assert_ne!(first, second);
    }

    #[test]
    fn test_each_plan_gets_its_own_start_node() {
        let mut d = dispatcher();
        d.add_package(package(1, 3, 0.1, 0.4));
        let first = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let old_start = d
            .locations()
            .find(NodeKind::RouteStart, first.get())
            .expect("start node");
        run_to_end(&mut d, first);

        d.add_package(package(2, 3, 0.2, 0.4));
        let pickup = d.register_location(NodeKind::Producer, 2, GeoPoint::new(0.0, 0.2));
        d.insert_edge(old_start, pickup, DistanceEdge::new(1000.0, 900.0));
        let second = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");

        let new_start = d
            .locations()
            .find(NodeKind::RouteStart, second.get())
            .expect("start node");
        assert_ne!(old_start, new_start);
        assert_eq!(d.locations().point(old_start), Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(d.locations().point(new_start), Some(GeoPoint::new(0.0, 0.4)));
        // About 44 km out and back; the old start's edge does not apply.
        let km = d.route(second).map(Route::planned_distance_km).expect("route");
        assert!(km < 100.0, "planned {km} km");
    }

    #[test]
    fn test_planned_totals_match_across_algorithms() {
        let build = || {
            let mut d = dispatcher();
            d.add_package(package(1, 3, 0.1, 0.3));
            d.add_package(package(2, 3, 0.2, 0.4));
            d
        };
        let mut a = build();
        let mut b = build();
        let ra = a.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let rb = b
            .plan_route(VehicleId::new(1), Algorithm::Dijkstra, now())
            .expect("planned");
        let (ra, rb) = (a.route(ra).expect("route"), b.route(rb).expect("route"));
        assert!(ra.planned_distance_km() > 0.0);
        assert!(ra.planned_minutes() > 0.0);
        assert!((ra.planned_distance_km() - rb.planned_distance_km()).abs() < 1e-9);
        assert!((ra.planned_minutes() - rb.planned_minutes()).abs() < 1e-9);
    }

    #[test]
    fn test_start_non_top_rejected() {
        let mut d = dispatcher();
        d.add_package(package(1, 2, 0.1, 0.2));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let second = d
            .route(route)
            .and_then(|r| r.pending_tasks().get(1).map(|t| t.id()))
            .expect("two tasks");
        assert!(matches!(
            d.start_task(route, second, now()),
            Err(DispatchError::Schedule(ScheduleError::NotTopPriority { .. }))
        ));
    }

    #[test]
    fn test_start_unknown_route() {
        let mut d = dispatcher();
        assert_eq!(
            d.start_task(RouteId::new(5), TaskId::new(1), now()),
            Err(DispatchError::UnknownRoute(RouteId::new(5)))
        );
    }

    #[test]
    fn test_quote() {
        let mut d = dispatcher();
        // About 56 km along the equator.
        let p = Package::new(
            PackageId::new(1),
            2,
            Site::new(1, GeoPoint::new(0.0, 0.0)),
            Site::new(2, GeoPoint::new(0.0, 0.5)),
        );
        let haul = p.haul_km();
        d.add_package(p);
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let top = d.route(route).and_then(Route::top_pending).map(Task::id).expect("task");
        let quote = d.start_task(route, top, now()).expect("top task");

        assert!((quote.distance_km - haul).abs() < 1e-10);
        assert_eq!(quote.demand, 1);
        assert!((200.0..=5000.0).contains(&quote.cost_per_section));
        let expected_secs = haul / 60.0 * 1.1 * 3600.0;
        let actual_secs = quote.estimated_completion.duration_since(now()).as_secs_f64();
        assert!((actual_secs - expected_secs).abs() < 1e-3);
    }

    #[test]
    fn test_measured_edge_used_for_pricing() {
        let mut d = dispatcher();
        d.add_package(package(1, 2, 0.1, 0.2));
        let from = d.register_location(NodeKind::Producer, 1, GeoPoint::new(0.0, 0.1));
        let to = d.register_location(NodeKind::Destination, 1001, GeoPoint::new(0.0, 0.2));
        d.insert_edge(from, to, DistanceEdge::new(123.0, 200.0));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let top = d.route(route).and_then(Route::top_pending).map(Task::id).expect("task");
        let quote = d.start_task(route, top, now()).expect("top task");
        assert_eq!(quote.distance_km, 123.0);
    }

    #[test]
    fn test_full_route_lifecycle() {
        let mut d = dispatcher();
        d.add_package(package(1, 3, 0.1, 0.4));
        d.add_package(package(2, 5, 0.2, 0.3));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");

        let done = run_to_end(&mut d, route);
        assert_eq!(done.len(), 4);
        assert!(done.last().is_some_and(|c| c.route_completed && c.remaining.is_empty()));
        assert!(done.iter().all(|c| c.total_cost >= 0.0));

        assert_eq!(d.route(route).map(Route::status), Some(RouteStatus::Completed));
        let vehicle = d.vehicle(VehicleId::new(1)).expect("vehicle");
        assert_eq!(vehicle.status(), VehicleStatus::Idle);
        assert_eq!(vehicle.used(), 0);
        for id in [1, 2] {
            assert_eq!(
                d.package(PackageId::new(id)).map(Package::status),
                Some(PackageStatus::Delivered)
            );
        }
        assert_eq!(d.active_demand(), 0);
    }

    #[test]
    fn test_pickup_loads_vehicle() {
        let mut d = dispatcher();
        d.add_package(package(1, 3, 0.1, 0.4));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let top = d.route(route).and_then(Route::top_pending).cloned().expect("task");
        assert_eq!(top.kind(), TaskKind::Pickup);

        d.start_task(route, top.id(), now()).expect("top task");
        let done = d.complete_task(route, top.id(), 3, now()).expect("completes");
        assert_eq!(done.vehicle_used, 3);
        assert_eq!(done.remaining.len(), 1);
        assert!(!done.route_completed);
        assert_eq!(
            d.package(PackageId::new(1)).map(Package::status),
            Some(PackageStatus::Loaded)
        );
        assert_eq!(
            d.vehicle(VehicleId::new(1)).map(Vehicle::location),
            Some(GeoPoint::new(0.0, 0.1))
        );
    }

    #[test]
    fn test_complete_requires_start() {
        let mut d = dispatcher();
        d.add_package(package(1, 3, 0.1, 0.4));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let top = d.route(route).and_then(Route::top_pending).map(Task::id).expect("task");
        assert!(matches!(
            d.complete_task(route, top, 3, now()),
            Err(DispatchError::Schedule(ScheduleError::InvalidTransition { .. }))
        ));
        assert_eq!(d.vehicle(VehicleId::new(1)).map(Vehicle::used), Some(0));
    }

    #[test]
    fn test_overloaded_pickup_rejected() {
        let mut d = dispatcher();
        d.add_package(package(1, 3, 0.1, 0.4));
        let route = d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        let top = d.route(route).and_then(Route::top_pending).map(Task::id).expect("task");
        d.start_task(route, top, now()).expect("top task");
        assert!(matches!(
            d.complete_task(route, top, 11, now()),
            Err(DispatchError::Capacity(_))
        ));
        // Still in progress, can be retried.
        assert!(d.complete_task(route, top, 3, now()).is_ok());
    }

    #[test]
    fn test_active_demand_counts_open_routes() {
        let mut d = dispatcher();
        d.add_vehicle(Vehicle::new(VehicleId::new(2), 10, GeoPoint::new(0.0, 0.0)));
        d.add_package(package(1, 8, 0.1, 0.4));
        d.add_package(package(2, 8, 0.2, 0.4));
        d.plan_route(VehicleId::new(1), Algorithm::AStar, now()).expect("planned");
        d.plan_route(VehicleId::new(2), Algorithm::AStar, now()).expect("planned");
        assert_eq!(d.active_demand(), 2);
    }

    #[test]
    fn test_pickups_first_moves_early_delivery() {
        let p = package(1, 2, 0.1, 0.2);
        let other = package(2, 2, 0.1, 0.2);
        let pickup = Task::pickup(TaskId::new(1), &p, NodeId::new(0));
        let delivery = Task::delivery(TaskId::new(2), &p, NodeId::new(1));
        let unrelated = Task::delivery(TaskId::new(3), &other, NodeId::new(2));

        let ordered = pickups_first(vec![delivery, unrelated, pickup]);
        let ids: Vec<u64> = ordered.iter().map(|t| t.id().get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        let orders: Vec<u32> = ordered.iter().map(Task::priority_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }
}
