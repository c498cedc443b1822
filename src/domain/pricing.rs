//! Order pricing. Prices are integer minor units; no discounts, no tax.

#[derive(Debug, Clone, Copy)]
pub struct PriceLine {
    pub unit_price: i64,
    pub quantity: i64,
}

pub fn subtotal(lines: &[PriceLine]) -> i64 {
    lines
        .iter()
        .map(|line| line.unit_price * line.quantity)
        .sum()
}

pub fn total(lines: &[PriceLine], shipping_fee: i64) -> i64 {
    subtotal(lines) + shipping_fee
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let lines = [
            PriceLine {
                unit_price: 18000,
                quantity: 2,
            },
            PriceLine {
                unit_price: 12000,
                quantity: 1,
            },
        ];
        assert_eq!(subtotal(&lines), 48000);
        assert_eq!(total(&lines, 0), 48000);
    }

    #[test]
    fn total_adds_flat_shipping() {
        let lines = [PriceLine {
            unit_price: 25000,
            quantity: 3,
        }];
        assert_eq!(total(&lines, 10000), 85000);
    }

    #[test]
    fn empty_cart_is_zero() {
        assert_eq!(subtotal(&[]), 0);
        assert_eq!(total(&[], 5000), 5000);
    }
}
