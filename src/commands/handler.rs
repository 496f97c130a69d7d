//! Handlers and the instances they run against.
//!
//! A handler is either a free function of the [`CommandContext`] or a method
//! on some host type `T`. Method handlers need an instance of `T` at
//! invocation time, which the registration's [`InstanceBinding`] supplies by
//! trying, in order:
//!
//! 1. an explicitly bound instance,
//! 2. a component resolved by the host's [`ComponentResolver`],
//! 3. a default-constructed instance (built once, then reused).

use super::context::CommandContext;
use anyhow::anyhow;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// Type-erased handler target.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Something that can run a command.
pub trait CommandHandler: Send + Sync {
    /// Run the command against `target` (if one was resolved).
    fn invoke(&self, target: Option<&Instance>, ctx: &CommandContext) -> anyhow::Result<()>;
}

/// Handler that needs no instance.
pub struct FnHandler<F> {
    f: F,
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&CommandContext) -> anyhow::Result<()> + Send + Sync,
{
    fn invoke(&self, _target: Option<&Instance>, ctx: &CommandContext) -> anyhow::Result<()> {
        (self.f)(ctx)
    }
}

/// Handler invoked on an instance of `T`.
pub struct MethodHandler<T, F> {
    f: F,
    _target: PhantomData<fn(&T)>,
}

impl<T, F> CommandHandler for MethodHandler<T, F>
where
    T: Any + Send + Sync,
    F: Fn(&T, &CommandContext) -> anyhow::Result<()> + Send + Sync,
{
    fn invoke(&self, target: Option<&Instance>, ctx: &CommandContext) -> anyhow::Result<()> {
        let target = target.ok_or_else(|| anyhow!("no instance of {} available", type_name::<T>()))?;
        let this = target
            .downcast_ref::<T>()
            .ok_or_else(|| anyhow!("resolved instance is not a {}", type_name::<T>()))?;
        (self.f)(this, ctx)
    }
}

/// Wrap a free function as a handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(&CommandContext) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(FnHandler { f })
}

/// Wrap a method of `T` as a handler.
pub fn method<T, F>(f: F) -> Arc<dyn CommandHandler>
where
    T: Any + Send + Sync,
    F: Fn(&T, &CommandContext) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(MethodHandler {
        f,
        _target: PhantomData,
    })
}

/// Host-side lookup of singleton components by type.
pub trait ComponentResolver: Send + Sync {
    /// Instance registered for `type_id`, if any.
    fn resolve(&self, type_id: TypeId, type_name: &'static str) -> Option<Instance>;
}

/// Resolver that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoComponents;

impl ComponentResolver for NoComponents {
    fn resolve(&self, _type_id: TypeId, _type_name: &'static str) -> Option<Instance> {
        None
    }
}

/// Simple type-keyed component map.
#[derive(Default, Clone)]
pub struct Components {
    instances: HashMap<TypeId, Instance>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` as the component for `T`.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.instances.insert(TypeId::of::<T>(), value);
        self
    }
}

impl ComponentResolver for Components {
    fn resolve(&self, type_id: TypeId, _type_name: &'static str) -> Option<Instance> {
        self.instances.get(&type_id).cloned()
    }
}

/// One way of obtaining a handler instance.
#[derive(Clone)]
pub enum InstanceStrategy {
    /// An instance bound at registration.
    Bound(Instance),
    /// A component looked up through the [`ComponentResolver`].
    Component {
        type_id: TypeId,
        type_name: &'static str,
    },
    /// Built with `Default` on first use, then reused.
    Construct {
        build: fn() -> Instance,
        cell: Arc<OnceLock<Instance>>,
    },
}

impl InstanceStrategy {
    fn rank(&self) -> u8 {
        match self {
            Self::Bound(_) => 0,
            Self::Component { .. } => 1,
            Self::Construct { .. } => 2,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Bound(_) => "bound",
            Self::Component { .. } => "component",
            Self::Construct { .. } => "constructed",
        }
    }

    fn resolve(&self, components: &dyn ComponentResolver) -> Option<Instance> {
        match self {
            Self::Bound(instance) => Some(Arc::clone(instance)),
            Self::Component { type_id, type_name } => components.resolve(*type_id, *type_name),
            Self::Construct { build, cell } => Some(Arc::clone(cell.get_or_init(*build))),
        }
    }
}

fn construct_default<T: Default + Any + Send + Sync>() -> Instance {
    Arc::new(T::default())
}

/// Ordered set of instance strategies for one registration.
#[derive(Clone, Default)]
pub struct InstanceBinding {
    strategies: Vec<InstanceStrategy>,
}

impl InstanceBinding {
    /// No instance: for free-function handlers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Bind `instance` directly.
    pub fn bound<T: Any + Send + Sync>(instance: Arc<T>) -> Self {
        Self::none().or_bound(instance)
    }

    /// Resolve `T` through the component resolver.
    pub fn component<T: Any + Send + Sync>() -> Self {
        Self::none().or_component::<T>()
    }

    /// Default-construct `T`.
    pub fn constructed<T: Default + Any + Send + Sync>() -> Self {
        Self::none().or_constructed::<T>()
    }

    pub fn or_bound<T: Any + Send + Sync>(self, instance: Arc<T>) -> Self {
        self.with(InstanceStrategy::Bound(instance))
    }

    pub fn or_component<T: Any + Send + Sync>(self) -> Self {
        self.with(InstanceStrategy::Component {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        })
    }

    pub fn or_constructed<T: Default + Any + Send + Sync>(self) -> Self {
        self.with(InstanceStrategy::Construct {
            build: construct_default::<T>,
            cell: Arc::new(OnceLock::new()),
        })
    }

    /// Add a strategy; strategies always run bound, component, constructed.
    pub fn with(mut self, strategy: InstanceStrategy) -> Self {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(InstanceStrategy::rank);
        self
    }

    /// Whether no strategy is configured.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First instance any strategy yields, with the strategy's label.
    pub fn resolve(&self, components: &dyn ComponentResolver) -> Option<(Instance, &'static str)> {
        self.strategies
            .iter()
            .find_map(|s| s.resolve(components).map(|instance| (instance, s.label())))
    }
}
