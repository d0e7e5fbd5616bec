//! Per-vendor accounts-payable roll-up of a project's documents.
//!
//! Reads persisted `financial_breakdown` totals only; line items are never
//! recomputed here.

use crate::models::money::percent_of;
use crate::models::{
    ApAmounts, ApSummaryReport, DocumentKind, DocumentRecord, FinancialBreakdown, InvoiceStatus,
    Project, ProjectSummary, Vendor, VendorApSummaryRow,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Documents fetched for one report.
#[derive(Debug, Clone, Copy)]
pub struct ApSummaryInput<'a> {
    pub project: &'a Project,
    pub vendors: &'a [Vendor],
    pub purchase_orders: &'a [DocumentRecord],
    pub change_orders: &'a [DocumentRecord],
    /// Already restricted to the report's bill-date range.
    pub invoices: &'a [DocumentRecord],
}

/// Number of documents whose stored breakdown could not be read, or whose
/// amounts left the `Decimal` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MalformedCounts {
    pub purchase_orders: usize,
    pub change_orders: usize,
    pub vendor_invoices: usize,
}

impl MalformedCounts {
    pub fn get(&self, kind: DocumentKind) -> usize {
        match kind {
            DocumentKind::PurchaseOrder => self.purchase_orders,
            DocumentKind::ChangeOrder => self.change_orders,
            DocumentKind::VendorInvoice => self.vendor_invoices,
        }
    }

    pub fn total(&self) -> usize {
        self.purchase_orders + self.change_orders + self.vendor_invoices
    }

    fn record(&mut self, kind: DocumentKind) {
        match kind {
            DocumentKind::PurchaseOrder => self.purchase_orders += 1,
            DocumentKind::ChangeOrder => self.change_orders += 1,
            DocumentKind::VendorInvoice => self.vendor_invoices += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApSummaryOutcome {
    pub report: ApSummaryReport,
    pub malformed: MalformedCounts,
}

/// Running sums of one report.
#[derive(Debug, Default)]
struct Ledger {
    per_vendor: HashMap<Uuid, ApAmounts>,
    running: ApAmounts,
    malformed: MalformedCounts,
}

impl Ledger {
    fn read(&mut self, doc: &DocumentRecord, kind: DocumentKind) -> (FinancialBreakdown, bool) {
        let normalized = FinancialBreakdown::normalize_stored(doc.financial_breakdown.as_ref());
        if normalized.malformed {
            self.malformed.record(kind);
        }
        (normalized.breakdown, normalized.malformed)
    }

    /// Add one document's amounts to its vendor.
    ///
    /// A document whose amounts cannot be computed, or would push a vendor or
    /// report column past the `Decimal` range, contributes nothing and counts
    /// as malformed.
    fn post(
        &mut self,
        kind: DocumentKind,
        vendor: Uuid,
        contribution: Option<ApAmounts>,
        already_malformed: bool,
    ) {
        let current = self.per_vendor.get(&vendor).cloned().unwrap_or_default();
        let posted = contribution.and_then(|delta| {
            Some((current.checked_add(&delta)?, self.running.checked_add(&delta)?))
        });
        match posted {
            Some((amounts, running)) => {
                self.per_vendor.insert(vendor, amounts);
                self.running = running;
            }
            None if !already_malformed => self.malformed.record(kind),
            None => {}
        }
    }
}

/// Build the AP summary for one project.
///
/// Rows follow the vendor list; documents without a vendor, or whose vendor
/// is not listed, are skipped. Vendors with no activity are dropped and the
/// rest are sorted by name, then uuid.
pub fn summarize(input: ApSummaryInput<'_>) -> ApSummaryOutcome {
    let listed: HashSet<Uuid> = input.vendors.iter().map(|vendor| vendor.uuid).collect();
    let mut ledger = Ledger::default();

    let orders = [
        (DocumentKind::PurchaseOrder, input.purchase_orders),
        (DocumentKind::ChangeOrder, input.change_orders),
    ];
    for (kind, documents) in orders {
        for doc in documents {
            let (breakdown, malformed) = ledger.read(doc, kind);
            let Some(vendor) = doc.vendor_uuid.filter(|uuid| listed.contains(uuid)) else {
                continue;
            };
            let total = breakdown.totals.grand_total(kind);
            let contribution = match kind {
                DocumentKind::ChangeOrder => ApAmounts {
                    change_order_amount: total,
                    ..ApAmounts::default()
                },
                _ => ApAmounts {
                    po_amount: total,
                    ..ApAmounts::default()
                },
            };
            ledger.post(kind, vendor, Some(contribution), malformed);
        }
    }

    for invoice in input.invoices {
        let kind = DocumentKind::VendorInvoice;
        let (breakdown, malformed) = ledger.read(invoice, kind);
        let Some(vendor) = invoice.vendor_uuid.filter(|uuid| listed.contains(uuid)) else {
            continue;
        };
        let value = if invoice.invoice_status() == InvoiceStatus::Paid {
            breakdown.totals.grand_total(kind)
        } else {
            Decimal::ZERO
        };
        let holdback = percent_of(
            invoice.amount.unwrap_or(Decimal::ZERO),
            Some(invoice.holdback.unwrap_or(Decimal::ZERO)),
        );
        let contribution = holdback.ok().map(|holdback| ApAmounts {
            total_invoice_value: value,
            paid_to_date: value,
            holdback,
            tax: breakdown.totals.tax_total,
            ..ApAmounts::default()
        });
        ledger.post(kind, vendor, contribution, malformed);
    }

    let Ledger {
        per_vendor,
        malformed,
        ..
    } = ledger;

    let mut seen = HashSet::new();
    let mut vendors: Vec<VendorApSummaryRow> = input
        .vendors
        .iter()
        .filter(|vendor| seen.insert(vendor.uuid))
        .filter_map(|vendor| {
            let amounts = per_vendor.get(&vendor.uuid)?.rounded();
            if amounts.is_inactive() {
                return None;
            }
            Some(VendorApSummaryRow {
                vendor_uuid: vendor.uuid,
                vendor_name: vendor.vendor_name.clone(),
                amounts,
            })
        })
        .collect();

    vendors.sort_by(|a, b| {
        a.vendor_name
            .cmp(&b.vendor_name)
            .then_with(|| a.vendor_uuid.cmp(&b.vendor_uuid))
    });

    let mut totals = ApAmounts::default();
    for row in &vendors {
        totals += &row.amounts;
    }

    ApSummaryOutcome {
        report: ApSummaryReport {
            project: ProjectSummary {
                project_name: input.project.project_name.clone(),
                project_id: input.project.project_id.clone(),
            },
            vendors,
            totals,
        },
        malformed,
    }
}
