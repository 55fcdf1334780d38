use geom::{Angle, GeoPoint};

use crate::Trace;

/// Lifting a finger and putting it back down usually leaves a little hook at the end of the
/// previous stroke. For every pair of consecutive segments, while the first ends in a junction
/// sharper than `min_angle`, drop its last two points. Returns how many points were removed.
///
/// This is irreversible, and running it again on its own output does nothing.
pub fn smooth_junctions(trace: &mut Trace, min_angle: Angle) -> usize {
    let segments = trace.segments_mut();
    let mut removed = 0;
    for idx in 1..segments.len() {
        let (before, after) = segments.split_at_mut(idx);
        let first = &mut before[idx - 1];
        let second = &after[0];

        while first.len() >= 3 && second.len() >= 2 {
            let angle = junction_angle(first[first.len() - 1], second[0], second[1]);
            if angle >= min_angle {
                break;
            }
            first.truncate(first.len() - 2);
            removed += 2;
        }
    }
    if removed > 0 {
        warn!("Smoothing stroke junctions removed {} points", removed);
    }
    removed
}

/// The angle at the start of the next stroke, treating (latitude, longitude) as a flat plane.
fn junction_angle(end: GeoPoint, vertex: GeoPoint, next: GeoPoint) -> Angle {
    Angle::at_vertex(
        (end.lat(), end.lon()),
        (vertex.lat(), vertex.lon()),
        (next.lat(), next.lon()),
    )
}
