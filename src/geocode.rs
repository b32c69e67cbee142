//! Forward geocoding against a Nominatim-style endpoint.
//!
//! Best-effort by design: every failure mode (timeout, HTTP error, unparsable
//! body, no result) yields `None`. Results go through an injected
//! [`GeocodeCache`] so repeated imports of the same addresses stay cheap.
//! The routing core never calls into this module; stops arrive there already
//! geocoded.

use std::collections::HashMap;
use std::sync::Mutex;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::geo::Coordinate;
use crate::traits::GeocodeCache;

/// Upper bound on concurrent in-flight geocode requests.
const MAX_CONCURRENT_REQUESTS: usize = 4;

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Contact address sent along per Nominatim usage policy.
    pub contact_email: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            contact_email: "dispatch.local@invalid".to_string(),
            timeout_secs: 7,
        }
    }
}

/// In-memory cache, the default collaborator when the embedding application
/// has no persistent one.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Coordinate>>,
}

impl GeocodeCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Coordinate> {
        self.entries.lock().ok()?.get(key).copied()
    }

    fn put(&self, key: &str, coordinate: Coordinate) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), coordinate);
        }
    }
}

#[derive(Debug)]
pub struct Geocoder<C: GeocodeCache> {
    config: GeocoderConfig,
    client: reqwest::blocking::Client,
    cache: C,
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

fn parse_coordinate(result: &SearchResult) -> Option<Coordinate> {
    let lat = result.lat.parse::<f64>().ok()?;
    let lon = result.lon.parse::<f64>().ok()?;
    let coordinate = Coordinate::new(lat, lon);
    coordinate.is_finite().then_some(coordinate)
}

impl Geocoder<MemoryCache> {
    pub fn new(config: GeocoderConfig) -> Result<Self, reqwest::Error> {
        Self::with_cache(config, MemoryCache::default())
    }
}

impl<C: GeocodeCache> Geocoder<C> {
    pub fn with_cache(config: GeocoderConfig, cache: C) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(format!(
                "tour-planner (contact: {})",
                config.contact_email
            ))
            .build()?;

        Ok(Self {
            config,
            client,
            cache,
        })
    }

    /// Resolve a free-form address to a coordinate.
    pub fn geocode_address(&self, address: &str) -> Option<Coordinate> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let key = format!("geo_addr_{}", address.to_lowercase());
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached);
        }

        let coordinate = self.search(&[
            ("q", address),
            ("format", "json"),
            ("limit", "1"),
            ("addressdetails", "0"),
            ("email", &self.config.contact_email),
        ])?;
        self.cache.put(&key, coordinate);
        Some(coordinate)
    }

    /// Resolve a postal code / city pair. Country defaults upstream; pass it
    /// explicitly here.
    pub fn geocode_zip_city(
        &self,
        zip: &str,
        city: &str,
        country: &str,
    ) -> Option<Coordinate> {
        if zip.trim().is_empty() && city.trim().is_empty() {
            return None;
        }

        let query = format!("{} {} {}", zip, city, country);
        let key = format!(
            "geo_zip_{}",
            query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
        );
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached);
        }

        let coordinate = self.search(&[
            ("postalcode", zip),
            ("city", city),
            ("country", country),
            ("format", "json"),
            ("limit", "1"),
            ("addressdetails", "0"),
            ("email", &self.config.contact_email),
        ])?;
        self.cache.put(&key, coordinate);
        Some(coordinate)
    }

    fn search(&self, params: &[(&str, &str)]) -> Option<Coordinate> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let results = self
            .client
            .get(url)
            .query(params)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<SearchResult>>())
            .ok()?;

        results.first().and_then(parse_coordinate)
    }

    /// Geocode many addresses with at most [`MAX_CONCURRENT_REQUESTS`]
    /// in-flight lookups. Output order matches input order.
    pub fn geocode_all(&self, addresses: &[String]) -> Vec<Option<Coordinate>>
    where
        C: Sync,
    {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(MAX_CONCURRENT_REQUESTS)
            .build()
        {
            Ok(pool) => pool,
            Err(_) => {
                return addresses
                    .iter()
                    .map(|address| self.geocode_address(address))
                    .collect();
            }
        };

        debug!(count = addresses.len(), "geocoding batch");
        pool.install(|| {
            addresses
                .par_iter()
                .map(|address| self.geocode_address(address))
                .collect()
        })
    }
}
