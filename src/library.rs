//! Document library access
//!
//! The corpus collaborator. The engine never mutates it and never reads
//! anything beyond the candidate fields; hosts usually construct one
//! from their own template catalog. The starter corpus covers the five
//! core domains so the engine is exercisable end-to-end without a host.

use crate::types::{DocumentCandidate, LocalizedText};

/// A read-only, in-memory set of document templates.
#[derive(Debug, Clone, Default)]
pub struct DocumentLibrary {
    documents: Vec<DocumentCandidate>,
}

impl DocumentLibrary {
    pub fn new(documents: Vec<DocumentCandidate>) -> Self {
        Self { documents }
    }

    pub fn candidates(&self) -> &[DocumentCandidate] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&DocumentCandidate> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The built-in bilingual starter corpus.
    pub fn starter() -> Self {
        let mut documents = Vec::new();

        let mut add = |id: &str,
                       category: &str,
                       name: LocalizedText,
                       description: LocalizedText,
                       keywords: &[&str]| {
            documents.push(DocumentCandidate {
                id: id.to_string(),
                category: category.to_string(),
                name,
                description,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            });
        };

        // Family law
        add(
            "divorce-settlement",
            "family-law",
            LocalizedText::bilingual("Divorce Settlement Agreement", "Acuerdo de Divorcio"),
            LocalizedText::bilingual(
                "Divide assets, debts, and responsibilities when a marriage ends",
                "Divide bienes, deudas y responsabilidades al terminar un matrimonio",
            ),
            &["divorce", "settlement", "marriage", "separation"],
        );
        add(
            "child-custody",
            "family-law",
            LocalizedText::bilingual("Child Custody Agreement", "Acuerdo de Custodia"),
            LocalizedText::new(
                "Set custody, visitation, and parenting time for your children",
            ),
            &["custody", "children", "parenting", "visitation"],
        );
        add(
            "separation-agreement",
            "family-law",
            LocalizedText::new("Separation Agreement"),
            LocalizedText::new("Formalize living apart before or instead of divorce"),
            &["separation", "marriage", "spouse"],
        );
        add(
            "child-support",
            "family-law",
            LocalizedText::new("Child Support Agreement"),
            LocalizedText::new("Document child support amounts and payment schedules"),
            &["child support", "payments", "children"],
        );
        add(
            "prenuptial",
            "family-law",
            LocalizedText::new("Prenuptial Agreement"),
            LocalizedText::new("Agree on property rights before getting married"),
            &["prenup", "marriage", "property"],
        );

        // Vehicle
        add(
            "vehicle-bill-of-sale",
            "vehicle",
            LocalizedText::bilingual("Vehicle Bill of Sale", "Contrato de Compraventa de Vehículo"),
            LocalizedText::new("Transfer ownership of a car, truck, or motorcycle"),
            &["vehicle", "car", "sale", "title"],
        );
        add(
            "vehicle-bill-of-sale-tx",
            "vehicle",
            LocalizedText::new("Texas Vehicle Bill of Sale"),
            LocalizedText::new("Transfer ownership of a car, truck, or motorcycle in Texas"),
            &["vehicle", "car", "sale", "title", "texas"],
        );
        add(
            "vehicle-lease",
            "vehicle",
            LocalizedText::new("Vehicle Lease Agreement"),
            LocalizedText::new("Lease a vehicle to or from another party"),
            &["vehicle", "lease"],
        );
        add(
            "odometer-statement",
            "vehicle",
            LocalizedText::new("Odometer Disclosure Statement"),
            LocalizedText::new("Certify a vehicle's mileage at the time of sale"),
            &["odometer", "mileage", "vehicle"],
        );

        // Business
        add(
            "llc-formation",
            "business",
            LocalizedText::bilingual("LLC Formation Package", "Paquete de Formación de LLC"),
            LocalizedText::new("Start a limited liability company for your business"),
            &["llc", "formation", "business", "company"],
        );
        add(
            "operating-agreement",
            "business",
            LocalizedText::new("LLC Operating Agreement"),
            LocalizedText::new("Define ownership and management of your business"),
            &["llc", "operating", "business", "members"],
        );
        add(
            "partnership-agreement",
            "business",
            LocalizedText::new("Partnership Agreement"),
            LocalizedText::new("Set terms between business partners"),
            &["partnership", "business", "partners"],
        );
        add(
            "service-agreement",
            "business",
            LocalizedText::new("Service Agreement"),
            LocalizedText::new("Define scope and payment for services between two parties"),
            &["service", "business", "client"],
        );
        add(
            "nda",
            "business",
            LocalizedText::bilingual(
                "Non-Disclosure Agreement (NDA)",
                "Acuerdo de Confidencialidad",
            ),
            LocalizedText::new("Keep business information confidential between parties"),
            &["nda", "non-disclosure", "confidentiality", "business"],
        );

        // Employment
        add(
            "employment-contract",
            "employment",
            LocalizedText::bilingual("Employment Contract", "Contrato de Trabajo"),
            LocalizedText::new("Hire an employee into your business with clear terms"),
            &["employment", "hire", "business", "employee"],
        );
        add(
            "offer-letter",
            "employment",
            LocalizedText::new("Job Offer Letter"),
            LocalizedText::new("Extend a formal employment offer to a candidate"),
            &["offer", "employment", "hire"],
        );
        add(
            "non-compete",
            "employment",
            LocalizedText::new("Non-Compete Agreement"),
            LocalizedText::new("Restrict competitive work after employment ends"),
            &["non-compete", "employment", "business"],
        );
        add(
            "severance-agreement",
            "employment",
            LocalizedText::new("Severance Agreement"),
            LocalizedText::new("Settle final pay and terms when employment ends"),
            &["severance", "termination", "employment"],
        );

        // Real estate
        add(
            "residential-lease",
            "real-estate",
            LocalizedText::bilingual(
                "Residential Lease Agreement",
                "Contrato de Arrendamiento Residencial",
            ),
            LocalizedText::new("Rent out a house or apartment to a tenant"),
            &["lease", "rental", "landlord", "tenant", "residential"],
        );
        add(
            "purchase-agreement",
            "real-estate",
            LocalizedText::new("Real Estate Purchase Agreement"),
            LocalizedText::new("Buy or sell a house, condo, or land"),
            &["purchase", "house", "property", "closing"],
        );
        add(
            "eviction-notice",
            "real-estate",
            LocalizedText::new("Eviction Notice"),
            LocalizedText::new("Notify a tenant to correct a violation or vacate"),
            &["eviction", "notice", "tenant", "landlord"],
        );
        add(
            "quitclaim-deed",
            "real-estate",
            LocalizedText::new("Quitclaim Deed"),
            LocalizedText::new("Transfer property interest without a sale"),
            &["deed", "property", "transfer"],
        );

        // Estate planning and money
        add(
            "last-will",
            "estate-planning",
            LocalizedText::bilingual("Last Will and Testament", "Testamento"),
            LocalizedText::new("Direct how your personal property is distributed"),
            &["will", "testament", "estate", "family"],
        );
        add(
            "power-of-attorney",
            "estate-planning",
            LocalizedText::new("Power of Attorney"),
            LocalizedText::new("Authorize someone to act on your behalf"),
            &["power of attorney", "agent", "authorization"],
        );
        add(
            "promissory-note",
            "financial",
            LocalizedText::new("Promissory Note"),
            LocalizedText::new("Document a personal loan and its repayment terms"),
            &["promissory", "loan", "repayment"],
        );
        add(
            "demand-letter",
            "financial",
            LocalizedText::new("Demand Letter"),
            LocalizedText::new("Formally demand payment or action before suing"),
            &["demand", "notice", "payment"],
        );

        Self::new(documents)
    }
}
