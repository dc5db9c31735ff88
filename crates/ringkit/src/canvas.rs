//! The drawing surface rings emit into, plus a retained scene that can be exported as SVG or
//! replayed by an immediate-mode painter.

use crate::geom::{Point, Transform, Viewport};
use crate::path::PathData;
use crate::ring::Color;
use derive_more::{Display, From, Into};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct GroupId(usize);

pub trait Canvas {
    /// Creates a nested group. `None` attaches it to the top level.
    fn group(&mut self, parent: Option<GroupId>) -> GroupId;
    /// Removes every child of `group`, shapes and nested groups alike.
    fn clear(&mut self, group: GroupId);
    fn path(&mut self, group: GroupId, data: PathData, fill: Color);
    fn circle(&mut self, group: GroupId, diameter: f64, center: Point, fill: Color);
    fn set_transform(&mut self, group: GroupId, transform: Transform);
    fn viewport(&self) -> Viewport;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path {
        data: PathData,
        fill: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Shape(Shape),
    Group(GroupId),
}

#[derive(Debug, Clone, Default)]
struct Group {
    transform: Transform,
    children: Vec<Node>,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    viewport: Viewport,
    groups: Vec<Group>,
    roots: Vec<GroupId>,
    background: Option<Color>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    pub fn children(&self, group: GroupId) -> &[Node] {
        self.groups
            .get(group.0)
            .map(|g| g.children.as_slice())
            .unwrap_or_default()
    }

    pub fn transform(&self, group: GroupId) -> Transform {
        self.groups
            .get(group.0)
            .map(|g| g.transform)
            .unwrap_or_default()
    }

    /// Shapes directly inside `group`, skipping nested groups.
    pub fn shapes(&self, group: GroupId) -> impl Iterator<Item = &Shape> {
        self.children(group).iter().filter_map(|node| match node {
            Node::Shape(shape) => Some(shape),
            Node::Group(_) => None,
        })
    }

    fn group_mut(&mut self, group: GroupId) -> Option<&mut Group> {
        let group = self.groups.get_mut(group.0);
        if group.is_none() {
            log::warn!("Drawing into unknown group");
        }
        group
    }

    /// Serialises the scene into a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let Viewport { width, height } = self.viewport;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        if let Some(bg) = self.background {
            let _ = writeln!(
                out,
                r#"<rect width="100%" height="100%" fill="{}"/>"#,
                hex(bg)
            );
        }
        for &root in &self.roots {
            self.write_group(&mut out, root, 1);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_group(&self, out: &mut String, group: GroupId, depth: usize) {
        let indent = "  ".repeat(depth);
        let transform = self.transform(group);
        if transform.is_identity() {
            let _ = writeln!(out, "{indent}<g>");
        } else {
            let _ = writeln!(out, r#"{indent}<g transform="{transform}">"#);
        }
        for node in self.children(group) {
            match node {
                Node::Shape(Shape::Path { data, fill }) => {
                    let _ = writeln!(out, r#"{indent}  <path d="{data}" fill="{}"/>"#, hex(*fill));
                }
                Node::Shape(Shape::Circle {
                    center,
                    radius,
                    fill,
                }) => {
                    let _ = writeln!(
                        out,
                        r#"{indent}  <circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                        center.x,
                        center.y,
                        hex(*fill)
                    );
                }
                Node::Group(child) => self.write_group(out, *child, depth + 1),
            }
        }
        let _ = writeln!(out, "{indent}</g>");
    }
}

pub fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

impl Canvas for Scene {
    fn group(&mut self, parent: Option<GroupId>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group::default());
        match parent {
            Some(parent) => {
                if let Some(g) = self.group_mut(parent) {
                    g.children.push(Node::Group(id));
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    fn clear(&mut self, group: GroupId) {
        if let Some(g) = self.group_mut(group) {
            g.children.clear();
        }
    }

    fn path(&mut self, group: GroupId, data: PathData, fill: Color) {
        if let Some(g) = self.group_mut(group) {
            g.children.push(Node::Shape(Shape::Path { data, fill }));
        }
    }

    fn circle(&mut self, group: GroupId, diameter: f64, center: Point, fill: Color) {
        if let Some(g) = self.group_mut(group) {
            g.children.push(Node::Shape(Shape::Circle {
                center,
                radius: diameter / 2.0,
                fill,
            }));
        }
    }

    fn set_transform(&mut self, group: GroupId, transform: Transform) {
        if let Some(g) = self.group_mut(group) {
            g.transform = transform;
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
