//! Service plan catalog

use serde::{Deserialize, Serialize};

/// One line in a plan's feature list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFeature {
    pub feature: String,
    pub included: bool,
}

/// A broadband plan as presented on the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub speed: String,
    pub price: String,
    pub features: Vec<PlanFeature>,
}

/// Plans grouped the way the home page shows them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCatalog {
    pub standard: Vec<Plan>,
    pub rural: Vec<Plan>,
}

impl PlanCatalog {
    /// Plans currently offered
    pub fn current() -> Self {
        Self {
            standard: vec![
                plan(
                    "Rural FTTH Voice Unlimited",
                    "Up to 25 Mbps till 10 GB, Up to 2 Mbps beyond 10 GB",
                    "₹249/mo",
                    "For New Customers only",
                ),
                plan(
                    "FTTH Voice Unlimited",
                    "Up to 25 Mbps till 20 GB, Up to 2 Mbps beyond 20 GB",
                    "₹299/mo",
                    "For New Customers only",
                ),
                plan(
                    "Fibre Rural Home WiFi",
                    "Up to 30 Mbps till 1400 GB, 4 Mbps beyond 1400 GB",
                    "₹399/mo",
                    "For INDIVIDUAL Category Only in Rural Areas",
                ),
                plan(
                    "Fibre Experience",
                    "Up to 30 Mbps till 1000 GB, 4 Mbps beyond 1000 GB",
                    "₹399/mo",
                    "Unlimited 24 Hours",
                ),
                plan(
                    "Fibre Basic Neo",
                    "Up to 50 Mbps till 3300 GB, 4 Mbps beyond 3300 GB",
                    "₹449/mo",
                    "Unlimited 24 Hours",
                ),
                plan(
                    "Fibre Basic",
                    "Up to 60 Mbps till 3300 GB, 4 Mbps beyond 3300 GB",
                    "₹499/mo",
                    "Unlimited 24 Hours",
                ),
            ],
            rural: vec![
                plan(
                    "Rural FTTH Voice Unlimited",
                    "Up to 25 Mbps till 50 GB, Up to 2 Mbps beyond 50GB",
                    "₹999/6mo",
                    "For New Rural Customers only",
                ),
                plan(
                    "FTTH Rural Voice Unlimited",
                    "Up to 25 Mbps till 1300 GB, Up to 2 Mbps beyond 1300GB",
                    "₹999/3mo",
                    "For Rural Areas Only",
                ),
                plan(
                    "Fibre Rural Home WiFi",
                    "Up to 25 Mbps till 1400 GB, Up to 2 Mbps beyond 1400GB",
                    "₹1999/6mo",
                    "For INDIVIDUAL Category Only in Rural Areas",
                ),
            ],
        }
    }

    /// Every plan, standard first
    pub fn all(&self) -> impl Iterator<Item = &Plan> {
        self.standard.iter().chain(self.rural.iter())
    }
}

// Every current plan shares the first two features
fn plan(name: &str, speed: &str, price: &str, eligibility: &str) -> Plan {
    Plan {
        name: name.to_string(),
        speed: speed.to_string(),
        price: price.to_string(),
        features: vec![
            PlanFeature { feature: "Unlimited Data Download".to_string(), included: true },
            PlanFeature { feature: "Unlimited calls to any network".to_string(), included: true },
            PlanFeature { feature: eligibility.to_string(), included: true },
        ],
    }
}
