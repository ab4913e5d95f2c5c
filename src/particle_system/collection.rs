use std::hash::BuildHasherDefault;

use glam::Vec2;
use hashers::fx_hash::FxHasher;
use itertools::Itertools;

use crate::{
    error::EmitterError,
    instance::InstanceBatch,
    particle_system::particles::Particle,
    systems::{Actor, Reapable, Renderable, Updateable},
    util::{index_set, FxHashMap},
};

/// The container an [`crate::particle_system::emitter::Emitter`] keeps its live particles in.
///
/// Batch operations are the expected path: collections backed by an index should rebuild it
/// once per batch rather than once per item.
pub trait DrawableCollection<T>: Send + Sync {
    fn append(&mut self, item: T);

    fn append_batch(&mut self, items: Vec<T>);

    /// Removes the items at `indices`. Out of range and duplicate indices are ignored.
    fn remove_batch(&mut self, indices: &[usize]);

    /// Updates every item.
    fn update(&mut self, delta_seconds: f32);

    /// Draws every item into `batch`.
    fn draw(&self, batch: &mut InstanceBatch);

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;

    fn len(&self) -> usize;

    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of items whose `can_reap` is true, in ascending order.
    fn reapable(&self) -> Vec<usize>;

    fn clear(&mut self);
}

/// Uniform grid over item positions.
#[derive(Debug)]
struct SpatialHash {
    cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialHash {
    fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::with_hasher(BuildHasherDefault::<FxHasher>::default()),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    fn rebuild(&mut self, positions: impl Iterator<Item = Vec2>) {
        self.cells.clear();
        for (index, position) in positions.enumerate() {
            let cell = self.cell_of(position);
            self.cells.entry(cell).or_default().push(index);
        }
    }

    fn with_neighbors(cell: (i32, i32)) -> impl Iterator<Item = (i32, i32)> {
        (-1..=1).cartesian_product(-1..=1).map(move |(dx, dy)| (cell.0 + dx, cell.1 + dy))
    }

    fn nearby(&self, position: Vec2) -> Vec<usize> {
        Self::with_neighbors(self.cell_of(position))
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .sorted()
            .collect()
    }
}

/// The standard [`DrawableCollection`]: a flat list of particles drawn in insertion order.
#[derive(Debug)]
pub struct ParticleList<T = Particle> {
    items: Vec<T>,
    spatial_hash: Option<SpatialHash>,
    index_rebuilds: usize,
}

impl<T> Default for ParticleList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            spatial_hash: None,
            index_rebuilds: 0,
        }
    }
}

impl<T> ParticleList<T>
where
    T: Updateable + Reapable + Renderable + Send + Sync,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list that keeps a grid index of its items' positions, for [`ParticleList::nearby`].
    ///
    /// A non-positive or non-finite `cell_size` disables the index.
    #[must_use]
    pub fn with_spatial_hash(cell_size: f32) -> Self {
        let spatial_hash =
            (cell_size.is_finite() && cell_size > 0.0).then(|| SpatialHash::new(cell_size));
        Self {
            spatial_hash,
            ..Self::default()
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn uses_spatial_hash(&self) -> bool {
        self.spatial_hash.is_some()
    }

    /// How many times the spatial index has been rebuilt.
    #[must_use]
    pub fn index_rebuilds(&self) -> usize {
        self.index_rebuilds
    }

    /// Indices of items in the cell containing `position` and the eight cells around it.
    ///
    /// Returns an empty list when the collection has no spatial index.
    #[must_use]
    pub fn nearby(&self, position: Vec2) -> Vec<usize> {
        self.spatial_hash
            .as_ref()
            .map(|hash| hash.nearby(position))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn reindex(&mut self) {
        if let Some(hash) = self.spatial_hash.as_mut() {
            hash.rebuild(self.items.iter().map(|item| item.get_instance().position));
            self.index_rebuilds += 1;
        }
    }
}

impl<T> DrawableCollection<T> for ParticleList<T>
where
    T: Updateable + Reapable + Renderable + Send + Sync,
{
    fn append(&mut self, item: T) {
        self.items.push(item);
        self.reindex();
    }

    fn append_batch(&mut self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        self.items.extend(items);
        self.reindex();
    }

    fn remove_batch(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let doomed = index_set(indices);
        let mut index = 0;
        self.items.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        self.reindex();
    }

    fn update(&mut self, delta_seconds: f32) {
        for item in &mut self.items {
            item.update(delta_seconds);
        }
        if !self.items.is_empty() {
            self.reindex();
        }
    }

    fn draw(&self, batch: &mut InstanceBatch) {
        batch.extend(self.items.iter().map(Renderable::get_instance));
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.items.len()
    }

    fn reapable(&self) -> Vec<usize> {
        self.items.iter().positions(Reapable::can_reap).collect()
    }

    fn clear(&mut self) {
        self.items.clear();
        self.reindex();
    }
}

/// A bare collection in an actor list updates and reaps its own items.
///
/// The collection itself is reapable once it is empty.
impl<T> Actor for ParticleList<T>
where
    T: Updateable + Reapable + Renderable + Send + Sync,
{
    fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        DrawableCollection::update(self, delta_seconds);
        let reap = self.reapable();
        self.remove_batch(&reap);
        Ok(())
    }

    fn draw(&self, batch: &mut InstanceBatch) {
        DrawableCollection::draw(self, batch);
    }

    fn can_reap(&self) -> bool {
        self.is_empty()
    }

    fn kill(&mut self) {
        self.clear();
    }
}
