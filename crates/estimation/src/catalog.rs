//! Field-shape catalog mapping each shape to its turn count and geometric shape factor.
//!
//! The two columns come from different model families and are not known for
//! every shape. Missing values stay `None`; models that need one report
//! [`EstimationError::ModelNotApplicable`] instead of guessing.

use std::borrow::Cow;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CatalogError, EstimationError};

/// Field shapes a flight pattern can be planned over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeId {
    Square,
    Rectangle,
    LongRectangle,
    Trapezium,
    Rhombus,
    SkewedRectangle,
    LShape,
}

impl ShapeId {
    pub const ALL: [ShapeId; 7] = [
        ShapeId::Square,
        ShapeId::Rectangle,
        ShapeId::LongRectangle,
        ShapeId::Trapezium,
        ShapeId::Rhombus,
        ShapeId::SkewedRectangle,
        ShapeId::LShape,
    ];

    /// Stable kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::Square => "square",
            ShapeId::Rectangle => "rectangle",
            ShapeId::LongRectangle => "long-rectangle",
            ShapeId::Trapezium => "trapezium",
            ShapeId::Rhombus => "rhombus",
            ShapeId::SkewedRectangle => "skewed-rectangle",
            ShapeId::LShape => "l-shape",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeId::Square => "Square",
            ShapeId::Rectangle => "Rectangle",
            ShapeId::LongRectangle => "Long Rectangle",
            ShapeId::Trapezium => "Trapezium",
            ShapeId::Rhombus => "Rhombus",
            ShapeId::SkewedRectangle => "Skewed Rectangle",
            ShapeId::LShape => "L-Shape",
        }
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeId {
    type Err = EstimationError;

    /// Case-insensitive; `-`, `_` and spaces are ignored (`LongRectangle`, `long-rectangle`, `l_shape`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let shape = match key.as_str() {
            "square" => ShapeId::Square,
            "rectangle" => ShapeId::Rectangle,
            "longrectangle" => ShapeId::LongRectangle,
            "trapezium" => ShapeId::Trapezium,
            "rhombus" => ShapeId::Rhombus,
            "skewedrectangle" => ShapeId::SkewedRectangle,
            "lshape" => ShapeId::LShape,
            _ => {
                return Err(EstimationError::UnknownShape {
                    shape_id: s.to_string(),
                });
            }
        };
        Ok(shape)
    }
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeEntry {
    pub shape: ShapeId,
    pub turn_count: Option<u32>,
    pub shape_factor: Option<f64>,
}

const BUILTIN_SHAPES: &[ShapeEntry] = &[
    ShapeEntry {
        shape: ShapeId::Square,
        turn_count: Some(16),
        shape_factor: Some(1.0),
    },
    ShapeEntry {
        shape: ShapeId::Rectangle,
        turn_count: Some(12),
        shape_factor: Some(1.4),
    },
    ShapeEntry {
        shape: ShapeId::LongRectangle,
        turn_count: None,
        shape_factor: Some(1.8),
    },
    ShapeEntry {
        shape: ShapeId::Trapezium,
        turn_count: None,
        shape_factor: Some(1.6),
    },
    ShapeEntry {
        shape: ShapeId::Rhombus,
        turn_count: None,
        shape_factor: Some(1.3),
    },
    ShapeEntry {
        shape: ShapeId::SkewedRectangle,
        turn_count: Some(11),
        shape_factor: Some(1.7),
    },
    ShapeEntry {
        shape: ShapeId::LShape,
        turn_count: Some(18),
        shape_factor: None,
    },
];

/// Read-only shape lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCatalog {
    entries: Cow<'static, [ShapeEntry]>,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShapeCatalog {
    /// The compiled-in table.
    pub const fn builtin() -> Self {
        Self {
            entries: Cow::Borrowed(BUILTIN_SHAPES),
        }
    }

    /// A custom table. Each shape may appear once, and shape factors must be positive.
    pub fn new(entries: Vec<ShapeEntry>) -> Result<Self, CatalogError> {
        for (index, entry) in entries.iter().enumerate() {
            if entries[..index].iter().any(|prior| prior.shape == entry.shape) {
                return Err(CatalogError::DuplicateShape(entry.shape));
            }
            if let Some(factor) = entry.shape_factor {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(CatalogError::InvalidShapeFactor(entry.shape));
                }
            }
        }
        Ok(Self {
            entries: Cow::Owned(entries),
        })
    }

    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    pub fn lookup(&self, shape: ShapeId) -> Result<&ShapeEntry, EstimationError> {
        self.entries
            .iter()
            .find(|entry| entry.shape == shape)
            .ok_or_else(|| EstimationError::UnknownShape {
                shape_id: shape.as_str().to_string(),
            })
    }

    /// Parse a shape identifier and look it up.
    pub fn resolve(&self, shape_id: &str) -> Result<&ShapeEntry, EstimationError> {
        let shape = shape_id.parse::<ShapeId>()?;
        self.lookup(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_every_shape() {
        let catalog = ShapeCatalog::builtin();
        for shape in ShapeId::ALL {
            assert_eq!(catalog.lookup(shape).unwrap().shape, shape);
        }
    }

    #[test]
    fn missing_columns_stay_empty() {
        let catalog = ShapeCatalog::builtin();
        let long = catalog.lookup(ShapeId::LongRectangle).unwrap();
        assert_eq!(long.turn_count, None);
        assert_eq!(long.shape_factor, Some(1.8));
        let l_shape = catalog.lookup(ShapeId::LShape).unwrap();
        assert_eq!(l_shape.turn_count, Some(18));
        assert_eq!(l_shape.shape_factor, None);
    }

    #[test]
    fn shape_names_parse_loosely() {
        assert_eq!("LongRectangle".parse::<ShapeId>().unwrap(), ShapeId::LongRectangle);
        assert_eq!("long-rectangle".parse::<ShapeId>().unwrap(), ShapeId::LongRectangle);
        assert_eq!("L_SHAPE".parse::<ShapeId>().unwrap(), ShapeId::LShape);
        assert_eq!("skewed rectangle".parse::<ShapeId>().unwrap(), ShapeId::SkewedRectangle);
        for shape in ShapeId::ALL {
            assert_eq!(shape.as_str().parse::<ShapeId>().unwrap(), shape);
        }
    }

    #[test]
    fn unknown_shape_keeps_raw_identifier() {
        let err = ShapeCatalog::builtin().resolve("Hexagon").unwrap_err();
        assert_eq!(
            err,
            EstimationError::UnknownShape {
                shape_id: "Hexagon".to_string()
            }
        );
    }

    #[test]
    fn custom_catalog_reports_absent_shapes() {
        let catalog = ShapeCatalog::new(vec![ShapeEntry {
            shape: ShapeId::Square,
            turn_count: Some(8),
            shape_factor: None,
        }])
        .unwrap();
        assert_eq!(catalog.lookup(ShapeId::Square).unwrap().turn_count, Some(8));
        assert!(matches!(
            catalog.lookup(ShapeId::Rhombus),
            Err(EstimationError::UnknownShape { shape_id }) if shape_id == "rhombus"
        ));
    }

    #[test]
    fn builtin_rows_pass_custom_validation() {
        let rows = ShapeCatalog::builtin().entries().to_vec();
        assert_eq!(ShapeCatalog::new(rows).unwrap(), ShapeCatalog::builtin());
    }

    #[test]
    fn custom_catalog_rejects_bad_rows() {
        let square = |shape_factor| ShapeEntry {
            shape: ShapeId::Square,
            turn_count: Some(16),
            shape_factor,
        };
        for factor in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                ShapeCatalog::new(vec![square(Some(factor))]),
                Err(CatalogError::InvalidShapeFactor(ShapeId::Square))
            );
        }
        assert_eq!(
            ShapeCatalog::new(vec![square(Some(1.0)), square(None)]),
            Err(CatalogError::DuplicateShape(ShapeId::Square))
        );
    }
}
