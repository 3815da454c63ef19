// src/models/mod.rs

pub mod api;
pub mod element;
pub mod form;
pub mod layout;

pub use element::{ElementStyle, ElementType, PlaceholderElement, TextAlign};
pub use form::{FieldValue, SlideFormData};
pub use layout::{LayoutDocument, LayoutKey, SlideContent};
