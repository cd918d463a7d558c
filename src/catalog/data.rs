//! Static demo catalog: three parts per stage.

use serde::Serialize;

use crate::stage::Stage;

/// One catalog record as the service returns it.
///
/// `socket` ties CPUs to motherboards and `wattage` is a PSU's rating; the
/// other attributes mirror what a configurator client reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: &'static str,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdp: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,
}

const fn part(id: i64, name: &'static str, price: f64) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        price,
        tdp: None,
        socket: None,
        wattage: None,
    }
}

const fn cpu(id: i64, name: &'static str, price: f64, tdp: &'static str, socket: &'static str) -> CatalogEntry {
    CatalogEntry {
        tdp: Some(tdp),
        socket: Some(socket),
        ..part(id, name, price)
    }
}

const fn board(id: i64, name: &'static str, price: f64, socket: &'static str) -> CatalogEntry {
    CatalogEntry {
        socket: Some(socket),
        ..part(id, name, price)
    }
}

const fn gpu(id: i64, name: &'static str, price: f64, tdp: &'static str) -> CatalogEntry {
    CatalogEntry {
        tdp: Some(tdp),
        ..part(id, name, price)
    }
}

const fn psu(id: i64, name: &'static str, price: f64, wattage: u32) -> CatalogEntry {
    CatalogEntry {
        wattage: Some(wattage),
        ..part(id, name, price)
    }
}

static CPUS: [CatalogEntry; 3] = [
    cpu(1, "Intel Core i5-12600K", 299.99, "125 W", "LGA1700"),
    cpu(2, "AMD Ryzen 5 5600X", 289.99, "65 W", "AM4"),
    cpu(3, "Intel Core i7-12700K", 409.99, "125 W", "LGA1700"),
];

static MOTHERBOARDS: [CatalogEntry; 3] = [
    board(1, "MSI MAG B660 TOMAHAWK", 189.99, "LGA1700"),
    board(2, "ASUS ROG STRIX B550-F", 179.99, "AM4"),
    board(3, "Gigabyte B660 AORUS Master", 209.99, "LGA1700"),
];

static COOLERS: [CatalogEntry; 3] = [
    part(1, "Cooler Master Hyper 212", 34.99),
    part(2, "Noctua NH-D15", 44.99),
    part(3, "be quiet! Dark Rock Pro 4", 39.99),
];

static GPUS: [CatalogEntry; 3] = [
    gpu(1, "NVIDIA RTX 3060 Ti", 399.99, "200 W"),
    gpu(2, "AMD RX 6700 XT", 479.99, "230 W"),
    gpu(3, "NVIDIA RTX 3070", 499.99, "220 W"),
];

static CASES: [CatalogEntry; 3] = [
    part(1, "Phanteks Eclipse P400A", 89.99),
    part(2, "Lian Li O11 Dynamic", 159.99),
    part(3, "Fractal Design Meshify C", 99.99),
];

static PSUS: [CatalogEntry; 3] = [
    psu(1, "EVGA SuperNOVA 650 G5", 109.99, 650),
    psu(2, "Corsair RM750x", 139.99, 750),
    psu(3, "Seasonic FOCUS GX-850", 149.99, 850),
];

static MEMORY: [CatalogEntry; 3] = [
    part(1, "Corsair Vengeance 16GB DDR4-3200", 89.99),
    part(2, "G.Skill Ripjaws V 32GB DDR4-3600", 129.99),
    part(3, "Crucial Ballistix 16GB DDR4-3600", 99.99),
];

static STORAGE: [CatalogEntry; 3] = [
    part(1, "Samsung 970 EVO Plus 1TB", 119.99),
    part(2, "WD Black SN750 1TB", 129.99),
    part(3, "Crucial P5 1TB", 109.99),
];

/// Every catalog entry for `stage`, ordered by id.
pub fn entries(stage: Stage) -> &'static [CatalogEntry] {
    match stage {
        Stage::Cpu => &CPUS,
        Stage::Motherboard => &MOTHERBOARDS,
        Stage::CpuCooler => &COOLERS,
        Stage::Gpu => &GPUS,
        Stage::Case => &CASES,
        Stage::Psu => &PSUS,
        Stage::Ram => &MEMORY,
        Stage::Storage => &STORAGE,
    }
}

pub fn find(stage: Stage, id: i64) -> Option<&'static CatalogEntry> {
    entries(stage).iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_sorted_entries() {
        for &stage in Stage::all() {
            let ids: Vec<i64> = entries(stage).iter().map(|e| e.id).collect();
            assert_eq!(ids, vec![1, 2, 3], "{}", stage);
        }
    }

    #[test]
    fn test_power_draw_present_for_cpus_and_gpus() {
        for entry in entries(Stage::Cpu).iter().chain(entries(Stage::Gpu)) {
            assert!(entry.tdp.is_some(), "{} has no tdp", entry.name);
        }
        assert!(entries(Stage::Psu).iter().all(|e| e.wattage.is_some()));
    }

    #[test]
    fn test_serialized_entry_omits_absent_fields() {
        let value = serde_json::to_value(find(Stage::Case, 2).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 2, "name": "Lian Li O11 Dynamic", "price": 159.99})
        );
    }
}
