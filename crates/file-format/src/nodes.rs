use serde::{Deserialize, Serialize};

use modeler_kernel::geometry::point::Point3d;
use modeler_kernel::shapes::{
    Editable, ExtrudedPolygon, GroupShape, LineShape, PlaneShape, Primitive, PrimitiveKind, Shape,
};
use modeler_kernel::GeometryError;

fn default_scale() -> f64 {
    1.0
}

/// One shape as written to disk: its colour plus the geometry tagged by
/// `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub color_index: usize,
    #[serde(flatten)]
    pub geometry: NodeGeometry,
}

/// Geometry of a node.
///
/// Corner lists hold world coordinates; placements are always baked
/// before writing. Control points are never stored. A group keeps its
/// children as they were when grouped, plus its own placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeGeometry {
    Point {
        position: [f64; 3],
    },
    Cube {
        position: [f64; 3],
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Sphere {
        position: [f64; 3],
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Line {
        corners: Vec<[f64; 3]>,
    },
    Plane {
        corners: Vec<[f64; 3]>,
    },
    ExtrudedPolygon {
        corners: Vec<[f64; 3]>,
    },
    Group {
        position: [f64; 3],
        #[serde(default = "default_scale")]
        scale: f64,
        children: Vec<NodeRecord>,
    },
}

impl NodeRecord {
    pub fn new(geometry: NodeGeometry) -> Self {
        Self {
            color_index: 0,
            geometry,
        }
    }

    pub fn from_shape(shape: &Shape) -> Self {
        let corners = || -> Vec<[f64; 3]> {
            shape
                .world_corners()
                .iter()
                .map(Point3d::to_array)
                .collect()
        };
        let geometry = match shape {
            Shape::Primitive(p) => {
                let position = p.position().to_array();
                let scale = p.placement().scale_factor();
                match p.kind() {
                    PrimitiveKind::Point => NodeGeometry::Point { position },
                    PrimitiveKind::Cube => NodeGeometry::Cube { position, scale },
                    PrimitiveKind::Sphere => NodeGeometry::Sphere { position, scale },
                }
            }
            Shape::Line(_) => NodeGeometry::Line { corners: corners() },
            Shape::Plane(_) => NodeGeometry::Plane { corners: corners() },
            Shape::Extruded(_) => NodeGeometry::ExtrudedPolygon { corners: corners() },
            Shape::Group(group) => NodeGeometry::Group {
                position: group.placement().position().to_array(),
                scale: group.placement().scale_factor(),
                children: group.children().iter().map(NodeRecord::from_shape).collect(),
            },
        };
        Self {
            color_index: shape.color_index(),
            geometry,
        }
    }

    /// Rebuild the shape. Extruded faces are derived again from the corners
    /// and group boxes from the children.
    pub fn to_shape(&self) -> Result<Shape, GeometryError> {
        let mut shape: Shape = match &self.geometry {
            NodeGeometry::Point { position } => {
                Primitive::new(PrimitiveKind::Point, Point3d::from_array(*position)).into()
            }
            NodeGeometry::Cube { position, scale } => {
                scaled_primitive(PrimitiveKind::Cube, *position, *scale)?
            }
            NodeGeometry::Sphere { position, scale } => {
                scaled_primitive(PrimitiveKind::Sphere, *position, *scale)?
            }
            NodeGeometry::Line { corners } => {
                let [start, end] = points::<2>(corners)?;
                LineShape::new(start, end).into()
            }
            NodeGeometry::Plane { corners } => PlaneShape::new(points::<4>(corners)?).into(),
            NodeGeometry::ExtrudedPolygon { corners } => {
                ExtrudedPolygon::from_corners(points::<8>(corners)?).into()
            }
            NodeGeometry::Group {
                position,
                scale,
                children,
            } => {
                check_scale(*scale)?;
                let children = children
                    .iter()
                    .map(NodeRecord::to_shape)
                    .collect::<Result<Vec<_>, _>>()?;
                let mut group = GroupShape::new(children)?;
                group.translate(Point3d::from_array(*position) - group.placement().position());
                if *scale != 1.0 {
                    group.scale(*scale);
                }
                group.into()
            }
        };
        shape.set_color_index(self.color_index);
        Ok(shape)
    }
}

fn check_scale(scale: f64) -> Result<(), GeometryError> {
    if scale > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::Degenerate {
            what: "non-positive scale",
        })
    }
}

fn scaled_primitive(
    kind: PrimitiveKind,
    position: [f64; 3],
    scale: f64,
) -> Result<Shape, GeometryError> {
    check_scale(scale)?;
    let mut primitive = Primitive::new(kind, Point3d::from_array(position));
    if scale != 1.0 {
        primitive.scale(scale);
    }
    Ok(primitive.into())
}

fn points<const N: usize>(corners: &[[f64; 3]]) -> Result<[Point3d; N], GeometryError> {
    if corners.len() != N {
        return Err(GeometryError::MissingState {
            expected: N,
            found: corners.len(),
        });
    }
    let mut out = [Point3d::ORIGIN; N];
    for (slot, c) in out.iter_mut().zip(corners) {
        *slot = Point3d::from_array(*c);
    }
    Ok(out)
}
