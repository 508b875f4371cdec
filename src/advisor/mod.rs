//! Fallback advice when nothing can be shipped.

use crate::model::{Producer, ProducerOption, ProductionDays, WaitRecommendation};

pub const COLD_CHAIN_UNSUPPORTED: &str =
    "Product requires cold storage, but no suitable nodes support cold storage at this time.";

pub fn not_found_message(product: &str) -> String {
    format!("Product '{product}' not found in the system.")
}

pub fn producers_available_message(product: &str) -> String {
    format!("No stock found, but producers are available to produce '{product}'.")
}

pub fn out_of_stock_message(product: &str) -> String {
    format!("Product '{product}' is currently out of stock across the network and not produced by any known producer.")
}

pub fn shortfall_message(product: &str, secured: u32) -> String {
    format!("Only {secured} units available for {product}. Please wait for restock.")
}

/// Producers whose catalogue lists `product` exactly, with their lead time.
pub fn producer_options(product: &str, producers: &[Producer]) -> Vec<ProducerOption> {
    producers
        .iter()
        .filter(|p| p.makes(product))
        .map(|p| ProducerOption {
            producer_name: p.name.clone(),
            address: p.address.clone(),
            production_days: p
                .lead_time(product)
                .map(ProductionDays::Days)
                .unwrap_or(ProductionDays::Unknown),
        })
        .collect()
}

/// Recommendation for a request that sourced nothing.
pub fn advise(product: &str, producers: &[Producer], cold_storage_required: bool) -> WaitRecommendation {
    let options = producer_options(product, producers);
    if !options.is_empty() {
        return WaitRecommendation {
            message: producers_available_message(product),
            producers: Some(options),
        };
    }

    if cold_storage_required {
        WaitRecommendation::message(COLD_CHAIN_UNSUPPORTED)
    } else {
        WaitRecommendation::message(out_of_stock_message(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lists_matching_producers() {
        let producers = vec![
            Producer::new("MediCorp", "0xM").produces("Paracetamol 500mg", 4),
            Producer::new("Other", "0xO").produces("Ibuprofen", 2),
            Producer::new("Slow", "0xS").produces_unscheduled("Paracetamol 500mg"),
        ];

        let wait = advise("Paracetamol 500mg", &producers, false);
        assert_eq!(wait.message, producers_available_message("Paracetamol 500mg"));
        assert_eq!(wait.producers, Some(vec![
            ProducerOption { producer_name: "MediCorp".into(), address: "0xM".into(), production_days: ProductionDays::Days(4) },
            ProducerOption { producer_name: "Slow".into(), address: "0xS".into(), production_days: ProductionDays::Unknown },
        ]));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let producers = vec![Producer::new("MediCorp", "0xM").produces("Paracetamol 500mg", 4)];
        assert!(producer_options("paracetamol 500mg", &producers).is_empty());
    }

    #[test]
    fn test_no_producer_messages() {
        let wait = advise("Insulin", &[], true);
        assert_eq!(wait, WaitRecommendation::message(COLD_CHAIN_UNSUPPORTED));

        let wait = advise("Insulin", &[], false);
        assert_eq!(wait.message, out_of_stock_message("Insulin"));
        assert!(wait.producers.is_none());
    }
}
