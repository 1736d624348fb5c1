//! Registration and ordering of link resolvers.

use anyhow::{Result, bail};
use std::fmt;

use super::links::{LinkResolver, ResolverContext};

/// Constructor run once per render pass.
pub type CreateResolver = fn(&ResolverContext) -> Box<dyn LinkResolver>;

/// Registration record for a link resolver.
///
/// Names the resolver, declares which resolvers it must run after or
/// before, and knows how to build a resolver for a render pass.
#[derive(Clone)]
pub struct ResolverFactory {
    name: &'static str,
    after: Vec<&'static str>,
    before: Vec<&'static str>,
    create: CreateResolver,
}

impl ResolverFactory {
    /// Creates record without ordering constraints.
    pub fn new(name: &'static str, create: CreateResolver) -> Self {
        Self {
            name,
            after: Vec::new(),
            before: Vec::new(),
            create,
        }
    }

    /// Requires this resolver to run after `name`.
    pub fn runs_after(mut self, name: &'static str) -> Self {
        self.after.push(name);
        self
    }

    /// Requires this resolver to run before `name`.
    pub fn runs_before(mut self, name: &'static str) -> Self {
        self.before.push(name);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn after(&self) -> &[&'static str] {
        &self.after
    }

    pub fn before(&self) -> &[&'static str] {
        &self.before
    }

    /// Builds the resolver for one render pass.
    pub fn create(&self, context: &ResolverContext) -> Box<dyn LinkResolver> {
        (self.create)(context)
    }
}

impl fmt::Debug for ResolverFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverFactory")
            .field("name", &self.name)
            .field("after", &self.after)
            .field("before", &self.before)
            .finish_non_exhaustive()
    }
}

/// Set of registered resolvers.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
    factories: Vec<ResolverFactory>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolver.
    ///
    /// # Errors
    ///
    /// Returns error if a resolver with the same name is already registered.
    pub fn register(&mut self, factory: ResolverFactory) -> Result<()> {
        if self.factories.iter().any(|f| f.name == factory.name) {
            bail!("Link resolver already registered: {}", factory.name);
        }
        self.factories.push(factory);
        Ok(())
    }

    /// Creates registry holding a single resolver.
    pub fn with_factory(factory: ResolverFactory) -> Self {
        Self {
            factories: vec![factory],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns resolvers in execution order.
    ///
    /// Every "after" and "before" constraint between registered resolvers
    /// holds in the result. Among resolvers free to run, registration order
    /// wins. Constraints naming unregistered resolvers are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the constraints form a cycle.
    pub fn ordered(&self) -> Result<Vec<&ResolverFactory>> {
        let count = self.factories.len();
        let index_of = |name: &str| self.factories.iter().position(|f| f.name == name);

        // edges[a] holds b when a must run before b
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut pending = vec![0usize; count];

        for (idx, factory) in self.factories.iter().enumerate() {
            for dep in factory.after.iter().filter_map(|name| index_of(name)) {
                edges[dep].push(idx);
                pending[idx] += 1;
            }
            for dependent in factory.before.iter().filter_map(|name| index_of(name)) {
                edges[idx].push(dependent);
                pending[dependent] += 1;
            }
        }

        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);

        while order.len() < count {
            let next = (0..count).find(|&idx| !placed[idx] && pending[idx] == 0);
            let Some(idx) = next else {
                bail!(
                    "Link resolver ordering constraints form a cycle: {}",
                    self.cycle_members(&placed, &edges).join(", ")
                );
            };

            placed[idx] = true;
            for &dependent in &edges[idx] {
                pending[dependent] -= 1;
            }
            order.push(&self.factories[idx]);
        }

        Ok(order)
    }

    /// Names the unplaced resolvers that lie on a constraint cycle.
    ///
    /// Unplaced resolvers with no edge into another unplaced resolver only
    /// wait on a cycle; pruning them repeatedly leaves the cycle members.
    fn cycle_members(&self, placed: &[bool], edges: &[Vec<usize>]) -> Vec<&'static str> {
        let mut on_cycle: Vec<bool> = placed.iter().map(|placed| !placed).collect();

        while let Some(sink) = (0..on_cycle.len())
            .find(|&idx| on_cycle[idx] && !edges[idx].iter().any(|&next| on_cycle[next]))
        {
            on_cycle[sink] = false;
        }

        (0..on_cycle.len())
            .filter(|&idx| on_cycle[idx])
            .map(|idx| self.factories[idx].name)
            .collect()
    }

    /// Instantiates the resolver chain for one render pass.
    ///
    /// # Errors
    ///
    /// Returns error if ordering constraints cannot be satisfied.
    pub fn create_chain(&self, context: &ResolverContext) -> Result<Vec<Box<dyn LinkResolver>>> {
        let ordered = self.ordered()?;
        tracing::trace!(
            resolvers = ?ordered.iter().map(|f| f.name).collect::<Vec<_>>(),
            "Creating link resolver chain"
        );
        Ok(ordered.into_iter().map(|f| f.create(context)).collect())
    }
}
