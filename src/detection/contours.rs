use image::GrayImage;
use imageproc::contours::find_contours as trace_borders;
use crate::models::Contour;

/// Trace every border in a binary edge image.
///
/// Outer borders and hole borders are both returned, as a flat list in
/// tracing order. Non-zero pixels are foreground.
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    trace_borders::<i32>(edges)
        .into_iter()
        .map(|border| Contour::new(border.points))
        .collect()
}

/// Sort contours by enclosed area, largest first, and keep the first `limit`.
///
/// Equal areas keep their tracing order.
pub fn rank_by_area(contours: Vec<Contour>, limit: usize) -> Vec<Contour> {
    let mut ranked: Vec<(f64, Contour)> = contours
        .into_iter()
        .map(|contour| (contour.area(), contour))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, contour)| contour).collect()
}
