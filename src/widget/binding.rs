//! Property-to-external-state bindings (spec.md §4.J "Binding support").
//!
//! No teacher module has an observer registry (the renderer's state is
//! pushed in by its caller every frame, never pulled); grounded directly on
//! spec.md's description of the original's binding layer: a property address
//! identifies a binding slot, and a binding either applies its update
//! immediately on write or defers it to the next tree update pass.

use std::collections::HashMap;

use crate::widget::WidgetId;

/// Identifies one bindable property slot on one widget: the property's
/// declaration index (spec.md §4.J's `(index, Type, flags, field, …)`
/// declaration shape) scoped to a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyAddress {
    pub widget: WidgetId,
    pub property_index: u32,
}

/// Whether a bound value is pushed to its widget as soon as it changes, or
/// queued until the tree's next update pass picks it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    Immediate,
    Deferred,
}

/// One registered observer: invoked with the widget id whose property
/// changed, so the caller can re-read whatever value it bound to.
type Observer = Box<dyn FnMut(WidgetId) + Send>;

/// Tracks which external observers care about which widget properties.
/// `Deferred` notifications accumulate in `pending` until
/// [`BindingRegistry::flush`] runs (once per tree update cycle); `Immediate`
/// ones fire inline from [`BindingRegistry::notify`].
#[derive(Default)]
pub struct BindingRegistry {
    observers: HashMap<PropertyAddress, Vec<(BindType, Observer)>>,
    pending: Vec<PropertyAddress>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        BindingRegistry::default()
    }

    pub fn bind(&mut self, address: PropertyAddress, bind_type: BindType, observer: Observer) {
        self.observers.entry(address).or_default().push((bind_type, observer));
    }

    pub fn unbind_widget(&mut self, widget: WidgetId) {
        self.observers.retain(|addr, _| addr.widget != widget);
        self.pending.retain(|addr| addr.widget != widget);
    }

    /// Called whenever a bound property changes value. `Immediate`
    /// observers run right away; `Deferred` ones are queued for `flush`.
    pub fn notify(&mut self, address: PropertyAddress) {
        let Some(observers) = self.observers.get_mut(&address) else {
            return;
        };
        let mut queued = false;
        for (bind_type, observer) in observers.iter_mut() {
            match bind_type {
                BindType::Immediate => observer(address.widget),
                BindType::Deferred => queued = true,
            }
        }
        if queued && !self.pending.contains(&address) {
            self.pending.push(address);
        }
    }

    /// Runs every queued deferred observer once, then clears the queue.
    /// Called once per tree update cycle (spec.md §4.K's per-frame
    /// pipeline), after the pass that produced the changes.
    pub fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for address in pending {
            if let Some(observers) = self.observers.get_mut(&address) {
                for (bind_type, observer) in observers.iter_mut() {
                    if *bind_type == BindType::Deferred {
                        observer(address.widget);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn widget_id(index: u32) -> WidgetId {
        WidgetId::from_raw(index, 0)
    }

    #[test]
    fn immediate_binding_fires_on_notify() {
        let mut registry = BindingRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let addr = PropertyAddress { widget: widget_id(1), property_index: 0 };
        registry.bind(addr, BindType::Immediate, Box::new(move |_| { calls_clone.fetch_add(1, Ordering::SeqCst); }));
        registry.notify(addr);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deferred_binding_waits_for_flush() {
        let mut registry = BindingRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let addr = PropertyAddress { widget: widget_id(1), property_index: 0 };
        registry.bind(addr, BindType::Deferred, Box::new(move |_| { calls_clone.fetch_add(1, Ordering::SeqCst); }));
        registry.notify(addr);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        registry.flush();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unbinding_a_widget_drops_its_observers() {
        let mut registry = BindingRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let addr = PropertyAddress { widget: widget_id(2), property_index: 0 };
        registry.bind(addr, BindType::Immediate, Box::new(move |_| { calls_clone.fetch_add(1, Ordering::SeqCst); }));
        registry.unbind_widget(widget_id(2));
        registry.notify(addr);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
