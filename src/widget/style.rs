//! Stylesheet selectors and the styling pass (spec.md §4.K step 2).
//!
//! No direct teacher or `original_source` analogue was re-readable for this
//! file (Styles.hpp is listed in `_INDEX.md` but its selector grammar is
//! described in spec.md §4.K directly); implemented against that
//! description: type/id/role/class/state/nth-child/universal/root/logical
//! (`all`/`any`/`not`)/descendant selectors, matched against a small
//! `SelectorTarget` trait so this module stays independent of the concrete
//! `Widget` type (`core.rs` implements the trait and supplies the setter
//! closures a matching rule runs).

use super::core::WidgetState;

/// What a stylesheet selector matches against. Implemented by
/// `crate::widget::core::Widget`.
pub trait SelectorTarget {
    fn type_name(&self) -> &str;
    fn widget_id(&self) -> Option<&str>;
    fn role(&self) -> Option<&str>;
    fn classes(&self) -> &[String];
    fn widget_state(&self) -> WidgetState;
    fn is_root(&self) -> bool;
    fn sibling_index(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Type(String),
    Id(String),
    Role(String),
    Class(String),
    State(WidgetState),
    NthChild(usize),
    Universal,
    Root,
    All(Vec<Selector>),
    Any(Vec<Selector>),
    Not(Box<Selector>),
    /// Matches if `ancestor` matches some widget in the ancestor chain and
    /// `self` (the boxed selector) matches the widget itself.
    Descendant(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// `ancestors` is ordered root-first, parent-last; it does not include
    /// `target` itself.
    pub fn matches<T: SelectorTarget>(&self, target: &T, ancestors: &[&dyn SelectorTarget]) -> bool {
        match self {
            Selector::Type(name) => target.type_name() == name,
            Selector::Id(id) => target.widget_id() == Some(id.as_str()),
            Selector::Role(role) => target.role() == Some(role.as_str()),
            Selector::Class(class) => target.classes().iter().any(|c| c == class),
            Selector::State(flags) => target.widget_state().contains(*flags),
            Selector::NthChild(n) => target.sibling_index() == *n,
            Selector::Universal => true,
            Selector::Root => target.is_root(),
            Selector::All(subs) => subs.iter().all(|s| s.matches(target, ancestors)),
            Selector::Any(subs) => subs.iter().any(|s| s.matches(target, ancestors)),
            Selector::Not(sub) => !sub.matches(target, ancestors),
            Selector::Descendant(ancestor_sel, self_sel) => {
                self_sel.matches(target, ancestors)
                    && ancestors.iter().any(|a| ancestor_sel.matches_dyn(*a, &[]))
            }
        }
    }

    /// Trait-object entry point used when matching an ancestor selector
    /// against an already-erased `&dyn SelectorTarget` (the ancestor's own
    /// further ancestors aren't threaded through here — nested `Descendant`
    /// selectors inside an ancestor clause are not supported).
    fn matches_dyn(&self, target: &dyn SelectorTarget, ancestors: &[&dyn SelectorTarget]) -> bool {
        match self {
            Selector::Type(name) => target.type_name() == name,
            Selector::Id(id) => target.widget_id() == Some(id.as_str()),
            Selector::Role(role) => target.role() == Some(role.as_str()),
            Selector::Class(class) => target.classes().iter().any(|c| c == class),
            Selector::State(flags) => target.widget_state().contains(*flags),
            Selector::NthChild(n) => target.sibling_index() == *n,
            Selector::Universal => true,
            Selector::Root => target.is_root(),
            Selector::All(subs) => subs.iter().all(|s| s.matches_dyn(target, ancestors)),
            Selector::Any(subs) => subs.iter().any(|s| s.matches_dyn(target, ancestors)),
            Selector::Not(sub) => !sub.matches_dyn(target, ancestors),
            Selector::Descendant(_, self_sel) => self_sel.matches_dyn(target, ancestors),
        }
    }
}

/// One `{Selector, Rules}` pair; `setters` runs (in source order) against
/// any widget the selector matches, inside the caller's `styleApplying`
/// scope (spec.md §4.K step 2: "merged in source order ... already
/// overridden properties are preserved").
pub struct StyleRule<W> {
    pub selector: Selector,
    pub setters: Vec<Box<dyn Fn(&mut W) + Send + Sync>>,
}

pub struct Stylesheet<W> {
    pub rules: Vec<StyleRule<W>>,
}

impl<W> Default for Stylesheet<W> {
    fn default() -> Self {
        Stylesheet { rules: Vec::new() }
    }
}

impl<W> Stylesheet<W> {
    pub fn new() -> Self {
        Stylesheet::default()
    }

    pub fn push(&mut self, selector: Selector, setters: Vec<Box<dyn Fn(&mut W) + Send + Sync>>) {
        self.rules.push(StyleRule { selector, setters });
    }

    /// Applies every matching rule's setters, in source order, to `widget`.
    /// Each setter closure is responsible for calling through with
    /// `applying_style = true` (e.g. `widget.background_color.set(v, true,
    /// false)`) so an already-`Overridden` property is left alone.
    pub fn apply(&self, widget: &mut W, ancestors: &[&dyn SelectorTarget])
    where
        W: SelectorTarget,
    {
        for rule in &self.rules {
            if rule.selector.matches(widget, ancestors) {
                for setter in &rule.setters {
                    setter(widget);
                }
            }
        }
    }
}
