//! Interactive design canvas for print-on-demand products.
//!
//! Users place text, uploaded images and clip-art as layers on a garment
//! mockup, then move, resize, rotate, flip, duplicate and delete them. Every
//! layer must stay inside the product's print-safe boundary. The host (a
//! browser page or native shell) forwards pointer and keyboard events to
//! [`engine::EngineCore`], paints the [`render::Scene`] it returns, and acts on
//! the [`engine::Action`]s it emits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine wiring every component together |
//! | [`layer`] | Layer types and the authoritative layer store |
//! | [`selection`] | Selection set, marquee and gesture sessions |
//! | [`transform`] | Boundary-clamped translate, group resize, rotate, flip |
//! | [`autofit`] | Frame-deferred text shrinking to fit the boundary |
//! | [`render`] | Display list with two-tier z-order and the selection overlay |
//! | [`hit`] | Hit-testing against the display list |
//! | [`geom`] | Points, rectangles, bounding boxes, clamped resize |
//! | [`metrics`] | Injected text measurement |
//! | [`input`] | Buttons, modifiers and keys |
//! | [`snapshot`] | Persisted design state |
//! | [`config`] | Environment-driven tuning |
//! | [`consts`] | Shared numeric defaults |

pub mod autofit;
pub mod config;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layer;
pub mod metrics;
pub mod render;
pub mod selection;
pub mod snapshot;
pub mod transform;
