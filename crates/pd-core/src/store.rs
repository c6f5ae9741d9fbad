//! The element store: the session's ordered, exclusively-owned collection.
//!
//! The store is the only place elements are created, mutated, or removed.
//! The canvas engine reads snapshots of it and sends geometry back through
//! `commit`.

use crate::error::{ElementError, StoreError};
use crate::id::{ElementId, IdAllocator};
use crate::model::*;

/// Ordered collection of elements plus the id counter that names them.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<Element>,
    ids: IdAllocator,
    min_size: f64,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self::with_min_size(MIN_ELEMENT_SIZE)
    }

    /// A store that raises new elements to `min_size` instead of the default floor.
    pub fn with_min_size(min_size: f64) -> Self {
        Self {
            elements: Vec::new(),
            ids: IdAllocator::new(),
            min_size,
        }
    }

    /// Elements in insertion (z) order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// An owned copy for handing to the canvas engine.
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Append a new element built from a form draft. Returns its fresh id.
    pub fn add(&mut self, draft: ElementDraft) -> ElementId {
        let id = self.ids.allocate();
        let element = Element::from_draft(id, draft, self.min_size);
        log::debug!(
            "store: add {id} {} at ({}, {}) {}x{}",
            element.kind,
            element.bounds.x,
            element.bounds.y,
            element.bounds.width,
            element.bounds.height
        );
        self.elements.push(element);
        id
    }

    /// Insert an element that already carries an id (document import).
    ///
    /// # Errors
    /// `DuplicateId` when the id is already present, or the element's own
    /// validation error.
    pub fn insert(&mut self, mut element: Element) -> Result<ElementId, ElementError> {
        element.validate()?;
        if self.position(element.id).is_some() {
            return Err(ElementError::DuplicateId(element.id));
        }
        element.normalize_fields();
        element.bounds = element.bounds.clamped_to_min(self.min_size);
        self.ids.observe(element.id);
        let id = element.id;
        self.elements.push(element);
        Ok(id)
    }

    /// Remove a single element. Its id is never handed out again.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.position(id)?;
        log::debug!("store: remove {id}");
        Some(self.elements.remove(idx))
    }

    /// Remove every element. The id counter keeps counting.
    pub fn clear(&mut self) {
        log::debug!("store: clear {} element(s)", self.elements.len());
        self.elements.clear();
    }

    /// Write back geometry from a finished drag/resize.
    ///
    /// # Errors
    /// `UnknownElement` if the element was removed while it was being
    /// manipulated; non-finite or non-positive geometry is rejected.
    pub fn commit(&mut self, update: GeometryUpdate) -> Result<&Element, StoreError> {
        let idx = self
            .position(update.id)
            .ok_or(StoreError::UnknownElement(update.id))?;
        let mut next = self.elements[idx].clone();
        next.bounds = update.bounds;
        next.validate()?;
        log::debug!(
            "store: commit {} -> ({}, {}) {}x{}",
            update.id,
            update.bounds.x,
            update.bounds.y,
            update.bounds.width,
            update.bounds.height
        );
        self.elements[idx] = next;
        Ok(&self.elements[idx])
    }

    /// Apply a property-form edit.
    ///
    /// # Errors
    /// `UnknownElement` for a missing id; validation errors for bad geometry.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) -> Result<&Element, StoreError> {
        let idx = self.position(id).ok_or(StoreError::UnknownElement(id))?;
        let mut next = self.elements[idx].clone();
        if let Some(bounds) = patch.bounds {
            next.bounds = bounds.clamped_to_min(self.min_size);
        }
        if let Some(text) = patch.text {
            next.text = text;
        }
        if let Some(options) = patch.options {
            next.options = options.into_iter().collect();
        }
        if let Some(color) = patch.color {
            next.color = color.resolve(next.kind);
        }
        next.normalize_fields();
        next.validate()?;
        self.elements[idx] = next;
        Ok(&self.elements[idx])
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> ElementId {
        self.ids.peek()
    }
}
