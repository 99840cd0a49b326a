use serde::Serialize;

use super::model::Plan;

/// Payment provider identifiers and display data for a paid plan
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanOffer {
    pub plan: Plan,
    pub price_id: String,
    pub product_id: String,
    pub name: String,
    pub price: String,
}

/// Static plan-key -> price/product table
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    offers: Vec<PlanOffer>,
}

impl PlanCatalog {
    pub fn new(offers: Vec<PlanOffer>) -> Self {
        Self { offers }
    }

    pub fn offers(&self) -> &[PlanOffer] {
        &self.offers
    }

    pub fn offer(&self, plan: Plan) -> Option<&PlanOffer> {
        self.offers.iter().find(|offer| offer.plan == plan)
    }

    pub fn plan_for_product(&self, product_id: &str) -> Option<Plan> {
        self.offers
            .iter()
            .find(|offer| offer.product_id == product_id)
            .map(|offer| offer.plan)
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new(vec![
            PlanOffer {
                plan: Plan::Starter,
                price_id: "price_1SSoHkDHUiJM3dnRCILFgJWr".to_string(),
                product_id: "prod_TPdY2x0VDdT389".to_string(),
                name: "Starter".to_string(),
                price: "R$ 49,99".to_string(),
            },
            PlanOffer {
                plan: Plan::Premium,
                price_id: "price_1SSoHxDHUiJM3dnRO0JzyuM6".to_string(),
                product_id: "prod_TPdZry595rL8FP".to_string(),
                name: "Premium".to_string(),
                price: "R$ 99,99".to_string(),
            },
        ])
    }
}
