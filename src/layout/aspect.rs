use url::Url;

/// Portrait 4:5 tile, the gallery's default crop.
pub const DEFAULT_ASPECT_RATIO: f64 = 1.25;

/// Height/width ratio read from an image URL, if it embeds its dimensions.
///
/// Recognized shapes:
/// - trailing `/{width}/{height}` path segments (`https://picsum.photos/600/400?random=1`,
///   `https://picsum.photos/seed/abc/200/300`)
/// - `w` and `h` query parameters (`...photo-123?w=150&h=150&fit=crop`)
pub fn parse_aspect_ratio(image_url: &str) -> Option<f64> {
    let url = Url::parse(image_url).ok()?;
    from_path(&url).or_else(|| from_query(&url))
}

/// Ratio used for balancing; never fails.
pub fn estimate_aspect_ratio(image_url: &str, fallback: f64) -> f64 {
    match parse_aspect_ratio(image_url) {
        Some(ratio) => ratio,
        None => {
            log::trace!("No dimensions in {}, using fallback ratio {}", image_url, fallback);
            fallback
        }
    }
}

fn ratio(width: u32, height: u32) -> Option<f64> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(height as f64 / width as f64)
}

fn from_path(url: &Url) -> Option<f64> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }
    let width = segments[segments.len() - 2].parse().ok()?;
    let height = segments[segments.len() - 1].parse().ok()?;
    ratio(width, height)
}

fn from_query(url: &Url) -> Option<f64> {
    let mut width = None;
    let mut height = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "w" | "width" => width = value.parse().ok(),
            "h" | "height" => height = value.parse().ok(),
            _ => {}
        }
    }
    ratio(width?, height?)
}
