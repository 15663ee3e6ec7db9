// Pattern 1: Prototype
// A value holder that clones itself, including a companion object that points
// back at its owner. The clone's companion must point at the clone.

pub mod layered;

use crate::report::{Check, Report};
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

pub const PRIMITIVE_COPIED: &str = "Primitive field values have been carried over to a clone. Yay!";
pub const PRIMITIVE_NOT_COPIED: &str = "Primitive field values have not been copied. Booo!";
pub const COMPONENT_CLONED: &str = "Simple component has been cloned. Yay!";
pub const COMPONENT_NOT_CLONED: &str = "Simple component has not been cloned. Booo!";
pub const BACK_REFERENCE_CLONED: &str = "Component with back reference has been cloned. Yay!";
pub const BACK_REFERENCE_NOT_CLONED: &str =
    "Component with back reference has not been cloned. Booo!";
pub const LINKED_TO_CLONE: &str = "Component with back reference is linked to the clone. Yay!";
pub const LINKED_TO_ORIGINAL: &str =
    "Component with back reference is linked to original object. Booo!";

/// Shared handle to a prototype. Identity is `Rc::ptr_eq`.
pub type PrototypeRef<C> = Rc<RefCell<Prototype<C>>>;

// ============================================================================
// Prototype
// ============================================================================

#[derive(Debug)]
pub struct Prototype<C> {
    primitive: i64,
    component: Option<Rc<C>>,
    circular_reference: Option<Rc<ComponentWithBackReference<C>>>,
}

impl<C> Default for Prototype<C> {
    fn default() -> Self {
        Self {
            primitive: 0,
            component: None,
            circular_reference: None,
        }
    }
}

impl<C> Prototype<C> {
    pub fn new() -> PrototypeRef<C> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn primitive(&self) -> i64 {
        self.primitive
    }

    pub fn set_primitive(&mut self, value: i64) {
        self.primitive = value;
    }

    pub fn component(&self) -> Option<&Rc<C>> {
        self.component.as_ref()
    }

    pub fn set_component(&mut self, component: C) {
        self.component = Some(Rc::new(component));
    }

    pub fn clear_component(&mut self) {
        self.component = None;
    }

    pub fn circular_reference(&self) -> Option<&Rc<ComponentWithBackReference<C>>> {
        self.circular_reference.as_ref()
    }

    /// Gives `this` a companion whose back-reference points at `this`.
    pub fn attach_back_reference(this: &PrototypeRef<C>) {
        let companion = ComponentWithBackReference::new(this);
        this.borrow_mut().circular_reference = Some(Rc::new(companion));
    }

    /// The naive copy: shares the component and the companion with the
    /// source, so the companion still points at the source.
    pub fn shallow_copy(this: &PrototypeRef<C>) -> PrototypeRef<C> {
        let source = this.borrow();
        Rc::new(RefCell::new(Self {
            primitive: source.primitive,
            component: source.component.clone(),
            circular_reference: source.circular_reference.clone(),
        }))
    }

    fn relink(&self, root: &PrototypeRef<C>) {
        if let Some(companion) = &self.circular_reference {
            companion.set_prototype(root);
        }
    }
}

impl<C: Clone> Prototype<C> {
    /// Two-step clone: duplicate every owned value, then rewrite the
    /// back-references of the duplicate to the new root.
    /// The source is left untouched.
    pub fn clone_prototype(this: &PrototypeRef<C>) -> PrototypeRef<C> {
        let copy = Rc::new(RefCell::new(this.borrow().duplicate()));
        copy.borrow().relink(&copy);
        debug!(
            has_component = copy.borrow().component.is_some(),
            has_back_reference = copy.borrow().circular_reference.is_some(),
            "prototype cloned and relinked"
        );
        copy
    }

    fn duplicate(&self) -> Self {
        Self {
            primitive: self.primitive,
            component: self.component.as_deref().map(|c| Rc::new(c.clone())),
            circular_reference: self
                .circular_reference
                .as_deref()
                .map(|companion| Rc::new(companion.duplicate())),
        }
    }
}

// ============================================================================
// Component with a back-reference
// ============================================================================

/// Holds a `Weak` link to its owner so the owner/companion cycle never leaks.
#[derive(Debug)]
pub struct ComponentWithBackReference<C> {
    prototype: RefCell<Weak<RefCell<Prototype<C>>>>,
}

impl<C> ComponentWithBackReference<C> {
    pub fn new(prototype: &PrototypeRef<C>) -> Self {
        Self {
            prototype: RefCell::new(Rc::downgrade(prototype)),
        }
    }

    /// `None` once the owner has been dropped.
    pub fn prototype(&self) -> Option<PrototypeRef<C>> {
        self.prototype.borrow().upgrade()
    }

    pub fn set_prototype(&self, prototype: &PrototypeRef<C>) {
        *self.prototype.borrow_mut() = Rc::downgrade(prototype);
    }

    pub fn points_to(&self, prototype: &PrototypeRef<C>) -> bool {
        std::ptr::eq(self.prototype.borrow().as_ptr(), Rc::as_ptr(prototype))
    }

    fn duplicate(&self) -> Self {
        Self {
            prototype: RefCell::new(self.prototype.borrow().clone()),
        }
    }
}

// ============================================================================
// Client checks
// ============================================================================

fn aliased<T>(left: Option<&Rc<T>>, right: Option<&Rc<T>>) -> bool {
    matches!((left, right), (Some(a), Some(b)) if Rc::ptr_eq(a, b))
}

/// Compares a clone against its original the way the demo client does.
pub fn inspect_clone<C>(original: &PrototypeRef<C>, copy: &PrototypeRef<C>) -> Report {
    let source = original.borrow();
    let cloned = copy.borrow();

    let linked_to_clone = cloned
        .circular_reference()
        .is_some_and(|companion| companion.points_to(copy));

    let mut report = Report::new();
    report
        .push(Check::new(
            source.primitive() == cloned.primitive(),
            PRIMITIVE_COPIED,
            PRIMITIVE_NOT_COPIED,
        ))
        .push(Check::new(
            !aliased(source.component(), cloned.component()),
            COMPONENT_CLONED,
            COMPONENT_NOT_CLONED,
        ))
        .push(Check::new(
            !aliased(source.circular_reference(), cloned.circular_reference()),
            BACK_REFERENCE_CLONED,
            BACK_REFERENCE_NOT_CLONED,
        ))
        .push(Check::new(linked_to_clone, LINKED_TO_CLONE, LINKED_TO_ORIGINAL));
    report
}

/// `p1` holds 245, the current time and a back-reference to itself.
pub fn sample_prototype() -> PrototypeRef<DateTime<Local>> {
    let p1 = Prototype::new();
    {
        let mut fields = p1.borrow_mut();
        fields.set_primitive(245);
        fields.set_component(Local::now());
    }
    Prototype::attach_back_reference(&p1);
    p1
}

pub fn run_demo() -> Report {
    let p1 = sample_prototype();
    let p2 = Prototype::clone_prototype(&p1);
    inspect_clone(&p1, &p2)
}

// ============================================================================
// Tests
// ============================================================================
