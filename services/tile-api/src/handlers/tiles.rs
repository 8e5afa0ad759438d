//! Weather tile endpoint.

use axum::{
    extract::{Extension, Path},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use renderer::{empty_tile, TileFormat, TileRenderer};
use std::sync::Arc;
use tile_common::{tile_to_coordinate, TileAddress, TileError, TileResult, WeatherRecord};
use tracing::{info, instrument, warn};

use crate::metrics::Timer;
use crate::state::AppState;

/// Parse `/tiles/{z}/{x}/{y}.{ext}` segments into a validated tile and format.
///
/// The extension is checked first so an unknown one is a 404 whatever the
/// numbers look like.
pub fn parse_tile_path(z: &str, x: &str, y_with_ext: &str) -> TileResult<(TileAddress, TileFormat)> {
    let (y, ext) = y_with_ext
        .rsplit_once('.')
        .ok_or_else(|| TileError::UnsupportedFormat(String::new()))?;
    let format: TileFormat = ext.parse()?;

    let segment = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| TileError::InvalidSegment(s.to_string()))
    };
    let tile = TileAddress::new(segment(z)?, segment(x)?, segment(y)?);
    tile.validate()?;

    Ok((tile, format))
}

/// GET /tiles/:z/:x/:y.{svg,png}
///
/// Any weather or render failure still yields a 200 with the empty tile.
#[instrument(skip(state))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((z, x, y)): Path<(String, String, String)>,
) -> Response {
    let (tile, format) = match parse_tile_path(&z, &x, &y) {
        Ok(parsed) => parsed,
        Err(e) => {
            state.metrics.record_rejected();
            warn!(error = %e, "Rejected tile request");
            let status = StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            return (status, e.to_string()).into_response();
        }
    };

    let coordinate = tile_to_coordinate(&tile);
    info!(
        z = tile.z,
        x = tile.x,
        y = tile.y,
        lat = coordinate.latitude,
        lon = coordinate.longitude,
        format = %format,
        "Tile request"
    );
    state.metrics.record_tile_request(format);

    let timer = Timer::start();
    let weather = state.weather.get_weather(coordinate).await;
    state.metrics.record_weather_lookup(timer.elapsed_us()).await;

    let has_weather = weather.is_some();
    if !has_weather {
        state.metrics.record_fallback(format);
    }

    let timer = Timer::start();
    let body = render_tile(&state.renderer, weather, format).await;
    state.metrics.record_render(format, timer.elapsed_us()).await;

    let cache_control = if has_weather {
        format!("public, max-age={}", state.weather.cache().ttl().as_secs())
    } else {
        "no-cache".to_string()
    };

    tile_response(format, body, &cache_control)
}

/// Render on the blocking pool for PNG, inline for SVG.
async fn render_tile(renderer: &TileRenderer, weather: Option<WeatherRecord>, format: TileFormat) -> Bytes {
    match format {
        TileFormat::Svg => renderer.render(weather.as_ref(), format),
        TileFormat::Png => {
            let renderer = renderer.clone();
            match tokio::task::spawn_blocking(move || renderer.render(weather.as_ref(), format)).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Render task failed, serving empty tile");
                    empty_tile(format)
                }
            }
        }
    }
}

fn tile_response(format: TileFormat, body: Bytes, cache_control: &str) -> Response {
    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(format.content_type()));
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    response
}
