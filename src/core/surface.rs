//=========================================================================
// Surface Container
//=========================================================================
//
// Owns the drawable surface bound to the host's anchor element and
// reports its live pixel size.
//
// Lifecycle:
//   new() ──> [pending]  ──on_initialized()──> [ready]
//
// The anchor element is the source of truth for size. The container only
// remembers the size it was created with; the controller compares live
// size against its own canvas size state each tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, warn};
use winit::dpi::PhysicalSize;

//=== Internal Dependencies ===============================================

use crate::core::config::MapOptions;
use crate::core::error::ConfigurationError;

//=== ContainerElement ====================================================

/// Host layout element the surface is anchored to.
pub trait ContainerElement {
    /// Current layout width in pixels.
    fn client_width(&self) -> u32;

    /// Current layout height in pixels.
    fn client_height(&self) -> u32;
}

//=== Overlay =============================================================

/// UI layer stacked above the drawable surface, hosting the facade's
/// widgets and markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    id: String,
}

impl Overlay {
    pub fn id(&self) -> &str {
        &self.id
    }
}

//=== Size Resolution =====================================================

/// Resolves the surface size: an explicit positive option wins per
/// dimension, otherwise the element's layout size is used.
///
/// # Errors
///
/// [`ConfigurationError::UnresolvableSurfaceSize`] if either resolved
/// dimension is zero.
pub fn resolve_surface_size(
    options: &MapOptions,
    element: &dyn ContainerElement,
) -> Result<PhysicalSize<u32>, ConfigurationError> {
    let width = options
        .width
        .filter(|w| *w > 0)
        .unwrap_or_else(|| element.client_width());
    let height = options
        .height
        .filter(|h| *h > 0)
        .unwrap_or_else(|| element.client_height());

    if width == 0 || height == 0 {
        warn!(target: "surface", "Surface size unresolvable: {}x{}", width, height);
        return Err(ConfigurationError::UnresolvableSurfaceSize { width, height });
    }

    Ok(PhysicalSize::new(width, height))
}

//=== SurfaceContainer ====================================================

pub struct SurfaceContainer {
    element: Rc<dyn ContainerElement>,
    surface_id: String,
    initial_size: PhysicalSize<u32>,
    overlay: Overlay,
    ready: bool,
}

impl SurfaceContainer {
    pub fn new(
        element: Rc<dyn ContainerElement>,
        surface_id: impl Into<String>,
        size: PhysicalSize<u32>,
    ) -> Self {
        let surface_id = surface_id.into();
        let overlay = Overlay {
            id: format!("{}-overlay", surface_id),
        };

        debug!(
            target: "surface",
            "Surface '{}' created at {}x{}",
            surface_id, size.width, size.height
        );

        Self {
            element,
            surface_id,
            initial_size: size,
            overlay,
            ready: false,
        }
    }

    /// Finalizes bindings deferred until the engine is live.
    pub fn on_initialized(&mut self) {
        if self.ready {
            warn!(target: "surface", "Surface '{}' already initialized", self.surface_id);
            return;
        }
        self.ready = true;
        debug!(target: "surface", "Surface '{}' bound to live engine", self.surface_id);
    }

    //--- Queries ----------------------------------------------------------

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn initial_size(&self) -> PhysicalSize<u32> {
        self.initial_size
    }

    /// Live width of the anchor element.
    pub fn width(&self) -> u32 {
        self.element.client_width()
    }

    /// Live height of the anchor element.
    pub fn height(&self) -> u32 {
        self.element.client_height()
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width(), self.height())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
