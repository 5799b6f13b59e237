//! Drawer registry: the service object that maps drawer ids to drawers.
//!
//! DESIGN
//! ======
//! One `DrawerRegistry` is constructed at startup and handed to every
//! consumer; clones share the same map. The map sits behind a mutex so
//! registration from several threads is safe. Listeners are called after
//! the lock is released, so a listener may query the registry.
//!
//! Re-registering an id overwrites the previous drawer and logs a warning;
//! lookups of unknown ids return `None`.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::DrawerConfig;
use crate::drawer::{Drawer, DrawerCategory};
use crate::element::ToolType;

/// Priority given to registrations that do not specify one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// A drawer plus its ordering and availability.
#[derive(Clone)]
pub struct DrawerRegistration {
    pub drawer: Arc<dyn Drawer>,
    /// Lower sorts first.
    pub priority: i32,
    pub enabled: bool,
}

impl DrawerRegistration {
    #[must_use]
    pub fn new(drawer: Arc<dyn Drawer>) -> Self {
        Self { drawer, priority: DEFAULT_PRIORITY, enabled: true }
    }

    #[must_use]
    pub fn with_priority(self, priority: i32) -> Self {
        Self { priority, ..self }
    }

    #[must_use]
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.drawer.meta().id
    }
}

impl std::fmt::Debug for DrawerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerRegistration")
            .field("id", &self.drawer.meta().id)
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered { id: String, replaced: bool },
    Unregistered { id: String, removed: bool },
    EnabledChanged { id: String, enabled: bool },
}

type Listener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

struct RegistryInner {
    drawers: HashMap<String, DrawerRegistration>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

#[derive(Clone)]
pub struct DrawerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl Default for DrawerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`DrawerRegistry::subscribe`].
#[must_use = "dropping a subscription keeps the listener registered; call unsubscribe to remove it"]
pub struct Subscription {
    registry: DrawerRegistry,
    id: u64,
}

impl Subscription {
    /// Stop delivering events to the listener.
    pub fn unsubscribe(self) {
        self.registry.lock().listeners.retain(|(id, _)| *id != self.id);
    }
}

impl DrawerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                drawers: HashMap::new(),
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// A registry pre-populated with the built-in drawers.
    #[must_use]
    pub fn with_builtins(config: &DrawerConfig) -> Self {
        let registry = Self::new();
        crate::drawers::register_builtins(&registry, config);
        registry
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: &RegistryEvent) {
        let listeners: Vec<Listener> = self.lock().listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(event);
        }
    }

    // --- Mutation ---

    /// Insert or overwrite by drawer id. Returns whether an entry was replaced.
    pub fn register(&self, registration: DrawerRegistration) -> bool {
        let id = registration.id().to_string();
        let replaced = self.lock().drawers.insert(id.clone(), registration).is_some();
        if replaced {
            tracing::warn!(drawer_id = %id, "drawer id already registered; overwriting");
        } else {
            tracing::debug!(drawer_id = %id, "drawer registered");
        }
        self.notify(&RegistryEvent::Registered { id, replaced });
        replaced
    }

    /// Shorthand for an enabled registration with the given priority.
    pub fn register_with_priority(&self, drawer: Arc<dyn Drawer>, priority: i32) -> bool {
        self.register(DrawerRegistration::new(drawer).with_priority(priority))
    }

    /// Remove a drawer. Returns whether it was present.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.lock().drawers.remove(id).is_some();
        tracing::debug!(drawer_id = %id, removed, "drawer unregistered");
        self.notify(&RegistryEvent::Unregistered { id: id.to_string(), removed });
        removed
    }

    /// Toggle availability. Returns `false` for an unknown id.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        let found = match self.lock().drawers.get_mut(id) {
            Some(reg) => {
                reg.enabled = enabled;
                true
            }
            None => false,
        };
        if found {
            self.notify(&RegistryEvent::EnabledChanged { id: id.to_string(), enabled });
        }
        found
    }

    /// Call `listener` on every registry change until unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription { registry: self.clone(), id }
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Drawer>> {
        self.lock().drawers.get(id).map(|r| Arc::clone(&r.drawer))
    }

    #[must_use]
    pub fn registration(&self, id: &str) -> Option<DrawerRegistration> {
        self.lock().drawers.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().drawers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registration sorted by priority, then by name.
    #[must_use]
    pub fn all(&self) -> Vec<DrawerRegistration> {
        let mut out: Vec<DrawerRegistration> = self.lock().drawers.values().cloned().collect();
        out.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.drawer.meta().name.cmp(&b.drawer.meta().name))
        });
        out
    }

    /// Enabled drawers in display order.
    #[must_use]
    pub fn enabled(&self) -> Vec<Arc<dyn Drawer>> {
        self.all().into_iter().filter(|r| r.enabled).map(|r| r.drawer).collect()
    }

    #[must_use]
    pub fn by_category(&self, category: DrawerCategory) -> Vec<Arc<dyn Drawer>> {
        self.all()
            .into_iter()
            .filter(|r| r.drawer.meta().category == category)
            .map(|r| r.drawer)
            .collect()
    }

    /// Resolve a key press to an enabled drawer, ignoring case.
    #[must_use]
    pub fn by_shortcut(&self, key: char) -> Option<Arc<dyn Drawer>> {
        let key = key.to_ascii_lowercase();
        self.enabled()
            .into_iter()
            .find(|d| d.meta().shortcut.to_ascii_lowercase() == key)
    }

    /// The first drawer in priority order producing `tool_type`.
    ///
    /// Disabled drawers still count: disabling hides a tool from the user but
    /// existing elements keep rendering and hit-testing.
    #[must_use]
    pub fn drawer_for(&self, tool_type: ToolType) -> Option<Arc<dyn Drawer>> {
        let inner = self.lock();
        inner
            .drawers
            .values()
            .filter(|r| r.drawer.meta().tool_type == tool_type)
            .min_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| a.drawer.meta().name.cmp(&b.drawer.meta().name))
            })
            .map(|r| Arc::clone(&r.drawer))
    }
}
