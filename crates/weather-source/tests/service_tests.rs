//! Tests for WeatherService cache-and-fetch behaviour.

use std::sync::Arc;
use std::time::Duration;
use storage::WeatherCache;
use test_utils::{fixtures, StubResponse, StubWeatherProvider};
use tile_common::GeoCoordinate;
use weather_source::WeatherService;

const TTL: Duration = Duration::from_secs(600);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

fn service_with(stub: Arc<StubWeatherProvider>, capacity: usize) -> WeatherService {
    WeatherService::new(Arc::new(WeatherCache::new(capacity, TTL)), stub, FETCH_TIMEOUT)
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let stub = Arc::new(StubWeatherProvider::returning(fixtures::clear_east_wind()));
    let service = service_with(stub.clone(), 100);

    let first = service.get_weather(GeoCoordinate::new(48.8566, 2.3522)).await;
    let second = service.get_weather(GeoCoordinate::new(48.8601, 2.3498)).await;

    assert_eq!(first, Some(fixtures::clear_east_wind()));
    assert_eq!(first, second);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_provider_receives_rounded_coordinate() {
    let stub = Arc::new(StubWeatherProvider::returning(fixtures::clear_east_wind()));
    let service = service_with(stub.clone(), 100);

    service.get_weather(GeoCoordinate::new(66.513_26, -180.0)).await;

    let requested = stub.requested();
    assert_eq!(requested.len(), 1);
    assert!((requested[0].latitude - 66.51).abs() < 1e-9);
    assert!((requested[0].longitude - (-180.0)).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_triggers_one_new_fetch() {
    let stub = Arc::new(StubWeatherProvider::returning(fixtures::clear_east_wind()));
    let service = service_with(stub.clone(), 100);
    let coord = GeoCoordinate::new(10.0, 10.0);

    service.get_weather(coord).await;
    tokio::time::advance(TTL).await;

    service.get_weather(coord).await;
    service.get_weather(coord).await;

    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_failure_returns_none_and_caches_nothing() {
    let stub = Arc::new(StubWeatherProvider::failing());
    let service = service_with(stub.clone(), 100);
    let coord = GeoCoordinate::new(10.0, 10.0);

    assert!(service.get_weather(coord).await.is_none());
    assert!(service.cache().is_empty().await);

    // The next lookup tries upstream again and can succeed
    stub.set_response(StubResponse::Record(fixtures::rain_south_wind()));
    assert_eq!(
        service.get_weather(coord).await,
        Some(fixtures::rain_south_wind())
    );
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_malformed_payload_returns_none() {
    let stub = Arc::new(StubWeatherProvider::with_response(StubResponse::Malformed));
    let service = service_with(stub.clone(), 100);

    assert!(service.get_weather(GeoCoordinate::new(0.0, 0.0)).await.is_none());
    assert!(service.cache().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out() {
    let stub = Arc::new(
        StubWeatherProvider::returning(fixtures::clear_east_wind())
            .with_delay(Duration::from_secs(30)),
    );
    let service = service_with(stub.clone(), 100);

    assert!(service.get_weather(GeoCoordinate::new(0.0, 0.0)).await.is_none());
    assert!(service.cache().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_caller_still_populates_cache() {
    let stub = Arc::new(
        StubWeatherProvider::returning(fixtures::clear_east_wind())
            .with_delay(Duration::from_secs(1)),
    );
    let service = service_with(stub.clone(), 100);
    let coord = GeoCoordinate::new(35.0, 139.0);

    // Caller gives up before the fetch completes
    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), service.get_weather(coord)).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(service.cache().len().await, 1);
    assert_eq!(
        service.get_weather(coord).await,
        Some(fixtures::clear_east_wind())
    );
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_capacity_bounds_distinct_coordinates() {
    let stub = Arc::new(StubWeatherProvider::returning(fixtures::clear_east_wind()));
    let service = service_with(stub.clone(), 5);

    for i in 0..20 {
        service
            .get_weather(GeoCoordinate::new(i as f64, i as f64))
            .await;
    }

    assert_eq!(service.cache().len().await, 5);
    assert_eq!(stub.calls(), 20);
}
