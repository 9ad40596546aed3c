//! Label and bounding-box types.

/// Unique identifier for a label within one image's label set.
pub type LabelId = u32;

/// Axis-aligned rectangle in image pixel coordinates.
///
/// Width and height are non-negative by construction through
/// [`BBox::from_corners`]; direct field writes are the caller's
/// responsibility. The classifier does not enforce a minimum size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    /// Create a box from origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized box from two corner points.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// Center x coordinate.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate.
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Resize to a new size, keeping the center fixed.
    pub fn resized_centered(&self, width: f32, height: f32) -> Self {
        Self {
            x: self.center_x() - width / 2.0,
            y: self.center_y() - height / 2.0,
            width,
            height,
        }
    }

    /// Move the center to a new position, keeping the size.
    pub fn with_center(&self, cx: f32, cy: f32) -> Self {
        Self {
            x: cx - self.width / 2.0,
            y: cy - self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Check if a point lies inside the box (half-open on the far edges).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// One annotated region: a box plus class name, color and identity.
///
/// `selected` is UI-transient state and is never persisted by the stores.
#[derive(Debug, Clone)]
pub struct Label {
    /// Unique id within the owning image's label set.
    pub id: LabelId,
    /// File name of the image this label belongs to.
    pub image_name: String,
    /// Class name; rewritten by rename operations.
    pub class_name: String,
    /// Box geometry in image pixel coordinates.
    pub bbox: BBox,
    /// Display color (RGB).
    pub color: [u8; 3],
    /// Transient selection flag.
    pub selected: bool,
}

impl Label {
    /// Create a new, unselected label.
    pub fn new(
        id: LabelId,
        image_name: impl Into<String>,
        class_name: impl Into<String>,
        bbox: BBox,
        color: [u8; 3],
    ) -> Self {
        Self {
            id,
            image_name: image_name.into(),
            class_name: class_name.into(),
            bbox,
            color,
            selected: false,
        }
    }
}
