// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in input sources.
//!
//! Exactly one platform set is active at a time: mouse and touch together on
//! platforms without a unified pointer stream, or a single unified source
//! (native or legacy) where one exists. Capability probing is the embedder's
//! concern; [`install`] wires the chosen set into an engine.

use alloc::boxed::Box;

use crate::engine::PointerEngine;

mod legacy;
mod mouse;
mod pointer;
mod touch;

pub use legacy::LegacySource;
pub use mouse::MouseSource;
pub use pointer::PointerSource;
pub use touch::{TouchSource, TouchSourceConfig};

/// The platform source sets an embedder can pick from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlatformSources {
    /// Separate mouse and touch streams, active together.
    MouseAndTouch,
    /// A native unified-pointer stream.
    Pointer,
    /// A legacy unified-pointer stream with numeric device codes.
    Legacy,
}

/// Registers the chosen platform source set with an engine.
pub fn install(engine: &mut PointerEngine, choice: PlatformSources) {
    match choice {
        PlatformSources::MouseAndTouch => {
            engine.register_source("mouse", Box::new(MouseSource::new()));
            engine.register_source("touch", Box::new(TouchSource::new()));
        }
        PlatformSources::Pointer => {
            engine.register_source("pointer", Box::new(PointerSource::new()));
        }
        PlatformSources::Legacy => {
            engine.register_source("legacy", Box::new(LegacySource::new()));
        }
    }
}
