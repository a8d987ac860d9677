//! Block transitions and safe drop-in positions.

use glam::Vec2;

use crate::constants::*;
use crate::entity::Entity;
use crate::geometry::Rect;

use super::block::WorldBlock;

/// Screen edge the player walked through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Grid offset of the neighbour behind this edge
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Edge::Left => (-1, 0),
            Edge::Right => (1, 0),
            Edge::Top => (0, -1),
            Edge::Bottom => (0, 1),
        }
    }

    pub fn neighbour(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let (dx, dy) = self.offset();
        (x + dx, y + dy)
    }

    /// Unit step along the edge, used to slide the drop-in point
    fn along(&self) -> Vec2 {
        match self {
            Edge::Left | Edge::Right => Vec2::Y,
            Edge::Top | Edge::Bottom => Vec2::X,
        }
    }
}

/// Edge the rect has crossed, if any. Touching an edge exactly is not a
/// crossing.
pub fn crossed_edge(rect: &Rect) -> Option<Edge> {
    if rect.x < 0.0 {
        Some(Edge::Left)
    } else if rect.right() > SCREEN_WIDTH {
        Some(Edge::Right)
    } else if rect.y < 0.0 {
        Some(Edge::Top)
    } else if rect.bottom() > SCREEN_HEIGHT {
        Some(Edge::Bottom)
    } else {
        None
    }
}

/// Top-left for a `size` square entering through the edge opposite the one
/// crossed, inset from it and clamped onto the screen along the other axis
pub fn entry_position(edge: Edge, position: Vec2, size: f32) -> Vec2 {
    let max_x = SCREEN_WIDTH - size;
    let max_y = SCREEN_HEIGHT - size;
    let x = position.x.clamp(0.0, max_x);
    let y = position.y.clamp(0.0, max_y);
    match edge {
        Edge::Left => Vec2::new(max_x - BLOCK_ENTRY_INSET, y),
        Edge::Right => Vec2::new(BLOCK_ENTRY_INSET, y),
        Edge::Top => Vec2::new(x, max_y - BLOCK_ENTRY_INSET),
        Edge::Bottom => Vec2::new(x, BLOCK_ENTRY_INSET),
    }
}

/// Find a clear spot near `position` along the entry edge. Candidates step
/// out 40 px at a time, alternating sides. If none is clear, the grass at
/// the original spot is cleared away instead.
pub fn resolve_safe_spawn(block: &mut WorldBlock, edge: Edge, position: Vec2, size: f32) -> Vec2 {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    let solid = block.solid_rects();
    let fits = |at: Vec2| {
        let rect = Rect::new(at.x, at.y, size, size);
        rect.is_inside(&screen) && !solid.iter().any(|r| r.intersects(&rect))
    };

    if fits(position) {
        return position;
    }

    for k in 1..=SAFE_SPAWN_TRIES {
        let distance = SAFE_SPAWN_STEP * k.div_ceil(2) as f32;
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let candidate = position + edge.along() * distance * sign;
        if fits(candidate) {
            tracing::debug!("Safe spawn shifted to ({:.0}, {:.0})", candidate.x, candidate.y);
            return candidate;
        }
    }

    let body = Rect::new(position.x, position.y, size, size);
    let before = block.entities.len();
    block
        .entities
        .retain(|e| !(matches!(e, Entity::Grass(_)) && e.rect().intersects(&body)));
    tracing::debug!(
        "Cleared {} grass tiles at the drop-in point of block {}",
        before - block.entities.len(),
        block.block_id
    );
    position
}
