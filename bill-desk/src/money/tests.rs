use super::*;
use chrono::TimeZone;

fn order(lines: Vec<OrderLine>, discount: Option<f64>) -> Order {
    Order {
        order_id: "ORD-42".to_string(),
        table_number: "4".to_string(),
        created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        payment_method: "Cash".to_string(),
        customer_name: "Ravi".to_string(),
        status: "completed".to_string(),
        lines,
        discount_amount: discount,
        points_used: None,
    }
}

fn two_line_order() -> Order {
    order(
        vec![
            OrderLine::new(1, "Butter Chicken", 2, 100.0),
            OrderLine::new(2, "Jeera Rice", 1, 50.0),
        ],
        None,
    )
}

fn rates(vat_low: f64, vat_high: f64, service_tax: f64, service_charge: f64) -> SurchargeRates {
    SurchargeRates::new(vat_low, vat_high, service_tax, service_charge).unwrap()
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let sum_f64 = 0.1_f64 + 0.2_f64;
    assert_ne!(sum_f64, 0.3);

    let sum_dec = to_decimal(0.1) + to_decimal(0.2);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_non_finite_becomes_zero() {
    assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
}

#[test]
fn test_out_of_range_price_saturates() {
    assert_eq!(to_decimal(1e30), Decimal::MAX);
    assert_eq!(to_decimal(-1e30), Decimal::MIN);
}

#[test]
fn test_huge_bill_saturates_instead_of_panicking() {
    let order = order(
        vec![
            OrderLine::new(1, "Banquet", i32::MAX, 1e20),
            OrderLine::new(2, "Banquet Hall", 1, 1e30),
        ],
        Some(10.0),
    );

    let bill = compute_bill(&order, &rates(5.0, 0.0, 0.0, 10.0), &[], false);

    assert_eq!(line_total(&order.lines[0]), Decimal::MAX);
    assert_eq!(bill.subtotal, Decimal::MAX);
    assert!(bill.discounted_subtotal < Decimal::MAX);
    assert_eq!(bill.surcharges.len(), 2);
    assert!(bill.surcharges.iter().all(|s| s.amount > Decimal::ZERO));
    assert_eq!(bill.grand_total, Decimal::MAX);
    assert!(!format_money(bill.grand_total).is_empty());
}

#[test]
fn test_format_money() {
    assert_eq!(format_money(Decimal::from(250)), "250.00");
    assert_eq!(format_money(Decimal::new(125, 1)), "12.50");
    assert_eq!(format_money(Decimal::new(12345, 3)), "12.35");
    assert_eq!(format_money(Decimal::new(-5, 0)), "-5.00");
}

#[test]
fn test_line_total() {
    let line = OrderLine::new(1, "Samosa", 3, 10.99);
    assert_eq!(to_f64(line_total(&line)), 32.97);
}

#[test]
fn test_reference_bill() {
    let bill = compute_bill(&two_line_order(), &rates(5.0, 0.0, 0.0, 10.0), &[], false);

    assert_eq!(bill.subtotal, Decimal::from(250));
    assert_eq!(bill.discounted_subtotal, Decimal::from(250));
    assert_eq!(bill.surcharges.len(), 2);
    assert_eq!(
        bill.surcharge(SurchargeKind::VatLow).unwrap().amount,
        Decimal::new(1250, 2)
    );
    assert_eq!(
        bill.surcharge(SurchargeKind::ServiceCharge).unwrap().amount,
        Decimal::new(2500, 2)
    );
    assert!(bill.surcharge(SurchargeKind::VatHigh).is_none());
    assert!(bill.surcharge(SurchargeKind::ServiceTax).is_none());
    assert_eq!(bill.grand_total, Decimal::new(28750, 2));
    assert_eq!(format_money(bill.grand_total), "287.50");
}

#[test]
fn test_breakdown_keeps_rate_order() {
    let bill = compute_bill(&two_line_order(), &rates(5.0, 18.0, 2.5, 10.0), &[], false);
    let kinds: Vec<_> = bill.surcharges.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, SurchargeKind::ALL.to_vec());
}

#[test]
fn test_zero_rates_suppressed() {
    let bill = compute_bill(&two_line_order(), &SurchargeRates::default(), &[], false);
    assert!(bill.surcharges.is_empty());
    assert_eq!(bill.grand_total, bill.discounted_subtotal);
}

#[test]
fn test_tiny_rate_is_listed() {
    let bill = compute_bill(&two_line_order(), &rates(0.0, 0.0, 0.001, 0.0), &[], false);
    assert_eq!(bill.surcharges.len(), 1);
    assert_eq!(bill.surcharges[0].kind, SurchargeKind::ServiceTax);
    assert_eq!(bill.surcharges[0].amount, Decimal::new(25, 4));
}

#[test]
fn test_total_identity_over_rate_grid() {
    let order = order(
        vec![
            OrderLine::new(1, "Masala Dosa", 3, 89.5),
            OrderLine::new(2, "Filter Coffee", 4, 25.25),
        ],
        Some(12.75),
    );
    let grid = [0.0, 0.5, 2.5, 5.0, 12.0, 18.0, 28.0, 100.0];

    for &a in &grid {
        for &b in &grid {
            let r = rates(a, b, a / 2.0, b / 4.0);
            let bill = compute_bill(&order, &r, &[], false);

            let included: Decimal = bill.surcharges.iter().map(|s| s.amount).sum();
            assert_eq!(bill.grand_total, bill.discounted_subtotal + included);

            for s in &bill.surcharges {
                assert!(s.rate > Decimal::ZERO);
                assert_eq!(s.amount, bill.discounted_subtotal * s.rate / Decimal::ONE_HUNDRED);
            }
        }
    }
}

#[test]
fn test_discount_subtracted_before_surcharges() {
    let order = order(vec![OrderLine::new(1, "Thali", 2, 150.0)], Some(50.0));
    let bill = compute_bill(&order, &rates(0.0, 0.0, 0.0, 10.0), &[], false);

    assert_eq!(bill.subtotal, Decimal::from(300));
    assert_eq!(bill.discount, Decimal::from(50));
    assert_eq!(bill.discounted_subtotal, Decimal::from(250));
    assert_eq!(bill.grand_total, Decimal::from(275));
}

#[test]
fn test_discount_larger_than_subtotal_is_not_clamped() {
    let order = order(vec![OrderLine::new(1, "Chai", 1, 20.0)], Some(50.0));
    let bill = compute_bill(&order, &rates(5.0, 0.0, 0.0, 0.0), &[], false);

    assert_eq!(bill.discounted_subtotal, Decimal::from(-30));
    assert_eq!(bill.surcharges[0].amount, Decimal::new(-150, 2));
    assert_eq!(bill.grand_total, Decimal::new(-3150, 2));
}

#[test]
fn test_extras_only_count_in_preview() {
    let order = two_line_order();
    let extras = vec![ExtraDish::new("Paneer Masala", 2, 170.0)];
    let r = rates(5.0, 0.0, 0.0, 10.0);

    let plain = compute_bill(&order, &r, &extras, false);
    let preview = compute_bill(&order, &r, &extras, true);

    assert_eq!(plain.lines.len(), 2);
    assert_eq!(preview.lines.len(), 3);
    assert_eq!(preview.subtotal - plain.subtotal, Decimal::from(340));
    assert_eq!(preview.lines[2].product_id, 0);
    assert_eq!(preview.lines[2].name.as_deref(), Some("Paneer Masala"));
    // Order itself is untouched
    assert_eq!(order.lines.len(), 2);
}

#[test]
fn test_preview_without_extras_matches_plain() {
    let order = two_line_order();
    let r = rates(5.0, 0.0, 0.0, 10.0);
    assert_eq!(
        compute_bill(&order, &r, &[], true),
        compute_bill(&order, &r, &[], false)
    );
}

#[test]
fn test_empty_order() {
    let bill = compute_bill(&order(vec![], None), &rates(5.0, 0.0, 0.0, 0.0), &[], false);
    assert_eq!(bill.subtotal, Decimal::ZERO);
    assert_eq!(bill.grand_total, Decimal::ZERO);
    assert_eq!(bill.surcharges.len(), 1);
}
