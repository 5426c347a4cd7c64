//! Editor core for the page-layout editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! editable project: translating pointer and keyboard events into element
//! mutations, hit-testing elements, keeping undo/redo history, and exporting
//! the live page as static HTML/CSS. The host JavaScript layer wires DOM
//! events to the engine, draws the DOM preview, and persists the project;
//! it reacts to the [`engine::Action`]s the engine returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Project, pages, and element-list mutations |
//! | [`doc`] | Element, style and link types |
//! | [`geometry`] | Drag/resize/rotate math and polygon clip paths |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against elements and selection handles |
//! | [`history`] | Debounced snapshot undo/redo |
//! | [`world`] | Location markers inside world elements |
//! | [`export`] | HTML and CSS export |
//! | [`bindings`] | `wasm-bindgen` export entry points |
//! | [`config`] | Editor tunables |
//! | [`consts`] | Shared constants (history limit, resize floor, etc.) |

pub mod bindings;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod history;
pub mod input;
pub mod scene;
pub mod world;
