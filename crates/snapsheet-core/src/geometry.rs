#![forbid(unsafe_code)]

//! Viewport classification and snap-point tables.
//!
//! A snap point is a logical rest position; its numeric value (percent of
//! viewport height, 0 at the bottom edge) depends on the viewport's size
//! class. The class is re-derived from the raw width on every resize and
//! never cached beyond the current reading.
//!
//! # Invariants
//!
//! 1. For every size class: `closed == 0.0 < half < full`.
//! 2. `step_up`/`step_down` saturate at `Full`/`Closed`.
//! 3. `SnapTable::for_class` is a pure table lookup, no interpolation.

/// Viewport dimensions in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in client pixels.
    pub width: f64,
    /// Height in client pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The size class for the current width.
    #[inline]
    #[must_use]
    pub fn size_class(&self) -> SizeClass {
        SizeClass::classify(self.width)
    }
}

/// Width-derived device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Width below 768 px.
    Mobile,
    /// Width in 768..=1024 px.
    Tablet,
    /// Width above 1024 px.
    Desktop,
}

impl SizeClass {
    /// Classify a viewport width.
    #[must_use]
    pub fn classify(width: f64) -> Self {
        if width < 768.0 {
            Self::Mobile
        } else if width <= 1024.0 {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

/// A logical rest position for the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapPoint {
    /// Fully retracted; numeric value is always 0.
    Closed,
    /// Partially raised.
    Half,
    /// Fully raised.
    Full,
}

impl SnapPoint {
    /// The adjacent snap point toward fully open; saturates at `Full`.
    #[must_use]
    pub fn step_up(self) -> Self {
        match self {
            Self::Closed => Self::Half,
            Self::Half | Self::Full => Self::Full,
        }
    }

    /// The adjacent snap point toward closed; saturates at `Closed`.
    #[must_use]
    pub fn step_down(self) -> Self {
        match self {
            Self::Full => Self::Half,
            Self::Half | Self::Closed => Self::Closed,
        }
    }
}

/// Numeric snap values in percent of viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTable {
    /// Value of [`SnapPoint::Closed`]; always 0.
    pub closed: f64,
    /// Value of [`SnapPoint::Half`].
    pub half: f64,
    /// Value of [`SnapPoint::Full`].
    pub full: f64,
}

impl SnapTable {
    /// The fixed table for a size class.
    #[must_use]
    pub const fn for_class(class: SizeClass) -> Self {
        match class {
            SizeClass::Mobile => Self {
                closed: 0.0,
                half: 50.0,
                full: 85.0,
            },
            SizeClass::Tablet => Self {
                closed: 0.0,
                half: 40.0,
                full: 75.0,
            },
            SizeClass::Desktop => Self {
                closed: 0.0,
                half: 35.0,
                full: 70.0,
            },
        }
    }

    /// The table for a viewport's current width.
    #[inline]
    #[must_use]
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self::for_class(viewport.size_class())
    }

    /// Resolve a logical snap point to its numeric value.
    #[inline]
    #[must_use]
    pub fn value(&self, snap: SnapPoint) -> f64 {
        match snap {
            SnapPoint::Closed => self.closed,
            SnapPoint::Half => self.half,
            SnapPoint::Full => self.full,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
