use crate::platform::{Bounds, Position};
use log::debug;

/// Strip along the top edge of the screen, centered horizontally, that reports hover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerZone {
    pub height: f64,
    pub half_width: f64,
}

impl Default for TriggerZone {
    fn default() -> Self {
        Self {
            height: 40.0,
            half_width: 150.0,
        }
    }
}

impl TriggerZone {
    pub fn bounds(&self, screen: &Bounds) -> Bounds {
        Bounds::new(
            screen.mid_x() - self.half_width,
            screen.max_y() - self.height,
            self.half_width * 2.0,
            self.height,
        )
    }

    /// The lower edge is exclusive, the side edges inclusive. Nothing above the zone is
    /// excluded, so a pointer reported past the top of the screen still counts.
    pub fn contains(&self, screen: &Bounds, position: &Position) -> bool {
        let zone = self.bounds(screen);
        position.y > zone.min_y() && position.x >= zone.min_x() && position.x <= zone.max_x()
    }
}

/// Tracks whether the pointer is inside the trigger zone and reports only changes.
#[derive(Debug, Default)]
pub struct HoverZoneDetector {
    zone: TriggerZone,
    inside: bool,
}

impl HoverZoneDetector {
    pub fn new(zone: TriggerZone) -> Self {
        Self {
            zone,
            inside: false,
        }
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Feeds one pointer sample. Returns the new state when it differs from the last
    /// one. Missing readings count as outside.
    pub fn poll(&mut self, position: Option<Position>, screen: Option<&Bounds>) -> Option<bool> {
        let inside = match (position, screen) {
            (Some(position), Some(screen)) => self.zone.contains(screen, &position),
            _ => false,
        };

        if inside == self.inside {
            return None;
        }

        debug!("Pointer {} trigger zone", if inside { "entered" } else { "left" });
        self.inside = inside;
        Some(inside)
    }
}
