/// Geo Scope WASM - filtering core for the field audit UI
///
/// Exposes geo-scope to the JavaScript state layer. Data crosses the boundary
/// as JSON text:
/// - The warehouse document is parsed once, when a `GeoScope` is constructed
/// - Each call takes the current selection ("geo") and returns scoped records
/// - Errors are only raised for unparseable text, never for odd shapes

use geo_scope::{
    scope, select_filtered_erfs, select_filtered_meters, select_filtered_premises,
    select_filtered_transactions, select_filtered_wards, select_transactions_by_actor, to_millis,
    GeneralConfig, GeoScopeConfig, GeoScopeError, GeoSelection, Timestamp, Warehouse,
};
use serde::Serialize;
use tracing::Level;
use wasm_bindgen::prelude::*;

// Log macro for debugging (uses console.log in WASM)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[cfg(not(target_arch = "wasm32"))]
fn log(s: &str) {
    tracing::info!("{}", s);
}

// =========================================================================
// GeoScope
// =========================================================================

/// Warehouse snapshot plus configuration, queried with selection JSON
#[wasm_bindgen]
pub struct GeoScope {
    warehouse: Warehouse,
    config: GeoScopeConfig,
}

#[wasm_bindgen]
impl GeoScope {
    /// Create from a warehouse JSON document with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(warehouse_json: &str) -> Result<GeoScope, JsValue> {
        Self::from_json(warehouse_json, GeoScopeConfig::default()).map_err(to_js)
    }

    /// Create from a warehouse JSON document and a YAML configuration
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(warehouse_json: &str, config_yaml: &str) -> Result<GeoScope, JsValue> {
        let config = GeoScopeConfig::from_yaml(config_yaml).map_err(to_js)?;
        Self::from_json(warehouse_json, config).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn wards(&self, geo_json: &str) -> Result<String, JsValue> {
        self.wards_json(geo_json).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn erfs(&self, geo_json: &str) -> Result<String, JsValue> {
        self.erfs_json(geo_json).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn premises(&self, geo_json: &str) -> Result<String, JsValue> {
        self.premises_json(geo_json).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn meters(&self, geo_json: &str) -> Result<String, JsValue> {
        self.meters_json(geo_json).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn transactions(&self, geo_json: &str) -> Result<String, JsValue> {
        self.transactions_json(geo_json).map_err(to_js)
    }

    /// Transactions created by one user, independent of the selection
    #[wasm_bindgen(js_name = transactionsByActor)]
    pub fn transactions_by_actor(&self, uid: &str) -> Result<String, JsValue> {
        self.transactions_by_actor_json(uid).map_err(to_js)
    }

    /// Ward / erf geometry lookup keyed by id
    #[wasm_bindgen(js_name = geoLibrary)]
    pub fn geo_library(&self) -> Result<String, JsValue> {
        self.geo_library_json().map_err(to_js)
    }

    /// All five scoped collections plus counts
    #[wasm_bindgen]
    pub fn scope(&self, geo_json: &str) -> Result<String, JsValue> {
        self.scope_json(geo_json).map_err(to_js)
    }
}

impl GeoScope {
    /// Build from warehouse JSON text; pure Rust counterpart of the constructor.
    pub fn from_json(warehouse_json: &str, config: GeoScopeConfig) -> Result<Self, GeoScopeError> {
        let value: serde_json::Value = serde_json::from_str(warehouse_json)?;
        let (warehouse, report) = Warehouse::ingest(&value, &config.warehouse)?;

        if !report.is_empty() {
            console(
                &config.general,
                Level::WARN,
                &format!("[geo-scope] repaired {} malformed warehouse entries", report.len()),
            );
        }

        Ok(Self { warehouse, config })
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn wards_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let result = select_filtered_wards(&self.warehouse.wards, &geo);
        self.trace("wards", &geo, result.len());
        to_json(&result)
    }

    pub fn erfs_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let result = select_filtered_erfs(&self.warehouse.erfs, &geo);
        self.trace("erfs", &geo, result.len());
        to_json(&result)
    }

    pub fn premises_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let erf_by_id = self.warehouse.erf_by_id();
        let result = select_filtered_premises(&self.warehouse.prems, &erf_by_id, &geo);
        self.trace("premises", &geo, result.len());
        to_json(&result)
    }

    pub fn meters_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let result = select_filtered_meters(&self.warehouse.meters, &geo);
        self.trace("meters", &geo, result.len());
        to_json(&result)
    }

    pub fn transactions_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let result = select_filtered_transactions(&self.warehouse.trns, &geo);
        self.trace("transactions", &geo, result.len());
        to_json(&result)
    }

    pub fn transactions_by_actor_json(&self, uid: &str) -> Result<String, GeoScopeError> {
        to_json(&select_transactions_by_actor(&self.warehouse.trns, uid))
    }

    pub fn geo_library_json(&self) -> Result<String, GeoScopeError> {
        to_json(&self.warehouse.geo_library())
    }

    pub fn scope_json(&self, geo_json: &str) -> Result<String, GeoScopeError> {
        let geo = parse_geo(geo_json)?;
        let view = scope(&self.warehouse, &geo);
        if self.traces_enabled() {
            log(&format!("[geo-scope] scope {:?}", view.summary));
        }
        to_json(&view)
    }

    /// Per-filter traces are debug level and need `trace_filters` as well.
    fn traces_enabled(&self) -> bool {
        self.config.general.trace_filters && self.config.general.allows(Level::DEBUG)
    }

    fn trace(&self, kind: &str, geo: &GeoSelection, matched: usize) {
        if self.traces_enabled() {
            log(&format!(
                "[geo-scope] {} focus={} matched={}",
                kind,
                geo.focus().as_str(),
                matched
            ));
        }
    }
}

/// Normalize a timestamp given as JSON text to epoch milliseconds.
///
/// Anything unparseable, including invalid JSON, yields `0`.
#[wasm_bindgen(js_name = toMillis)]
pub fn to_millis_json(value_json: &str) -> f64 {
    let millis = serde_json::from_str::<serde_json::Value>(value_json)
        .ok()
        .and_then(|value| Timestamp::from_value(&value))
        .map(|ts| to_millis(Some(&ts)))
        .unwrap_or(0);
    millis as f64
}

// =========================================================================
// Helpers
// =========================================================================

/// Write to the console when `general.log_level` lets `level` through
fn console(general: &GeneralConfig, level: Level, message: &str) -> bool {
    if !general.allows(level) {
        return false;
    }
    log(message);
    true
}

/// Empty or blank text means "no selection"
fn parse_geo(geo_json: &str) -> Result<GeoSelection, GeoScopeError> {
    if geo_json.trim().is_empty() {
        return Ok(GeoSelection::default());
    }
    let value: serde_json::Value = serde_json::from_str(geo_json)?;
    if value.is_null() {
        return Ok(GeoSelection::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, GeoScopeError> {
    Ok(serde_json::to_string(value)?)
}

fn to_js(err: GeoScopeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}


// =========================================================================
// WASM-specific Tests
// =========================================================================

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    use super::*;

    const DOCUMENT: &str = r#"{
        "wards": [{ "id": "w2", "code": 2 }, { "id": "w1", "code": 1 }],
        "prems": [{ "id": "p1", "erfId": 7 }]
    }"#;

    #[wasm_bindgen_test]
    fn test_wasm_wards_sorted() {
        let scope = GeoScope::new(DOCUMENT).unwrap();
        let wards: serde_json::Value = serde_json::from_str(&scope.wards("").unwrap()).unwrap();

        assert_eq!(wards[0]["id"], "w1");
        assert_eq!(wards[1]["id"], "w2");
    }

    #[wasm_bindgen_test]
    fn test_wasm_premises_keep_raw_fields() {
        let scope = GeoScope::new(DOCUMENT).unwrap();
        let premises: serde_json::Value =
            serde_json::from_str(&scope.premises("null").unwrap()).unwrap();

        assert_eq!(premises[0]["erfId"], 7);
    }

    #[wasm_bindgen_test]
    fn test_wasm_errors_cross_as_js_values() {
        assert!(GeoScope::new("{").is_err());
        assert!(GeoScope::with_config(r#"{"wards": 3}"#, "warehouse:\n  strict: true\n").is_err());
        assert!(GeoScope::new(DOCUMENT).unwrap().erfs("{selectedWard").is_err());
    }

    #[wasm_bindgen_test]
    fn test_wasm_to_millis() {
        assert_eq!(to_millis_json(r#"{"seconds":1000}"#), 1_000_000.0);
        assert_eq!(to_millis_json(r#""2024-03""#), 1_709_251_200_000.0);
        assert_eq!(to_millis_json("not json"), 0.0);
    }
}
