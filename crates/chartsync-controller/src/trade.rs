//! Trade intents and buy payload derivation.
//!
//! Each buy intent derives its price levels from the candle series at the
//! moment the user acts: stop entries anchor on the previous completed bar,
//! limit entries on the bar currently forming. The derivation is pure so it
//! can be checked without a running backend.

use crate::error::{ControllerError, ControllerResult};
use chartsync_api::{BuyOrderType, BuyPayload};
use chartsync_core::CandleSeries;

/// Price offset applied above the anchor for stop entries and cost levels.
const ENTRY_OFFSET: f64 = 0.05;
/// Price offset applied above the current close for limit entries.
const LIMIT_OFFSET: f64 = 2.0;

/// A user trade action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeIntent {
    /// Stop-loss buy above the previous bar's open.
    OpenStop,
    /// Stop-loss buy above the previous bar's high.
    HighStop,
    /// Limit buy above the current bar's close.
    LimitBuy,
    /// Buy bracketed by the previous bar's high/low range.
    HighLowBuy,
    /// Liquidate/reset the current position.
    SellAll,
}

impl TradeIntent {
    /// Whether the intent derives its prices from candle history.
    pub fn needs_history(&self) -> bool {
        !matches!(self, Self::SellAll)
    }
}

/// Derive the buy payload for `intent` from the candle series.
///
/// Returns `Ok(None)` for [`TradeIntent::SellAll`], which carries no body.
/// Fails with [`ControllerError::InsufficientData`] when the series holds
/// fewer bars than the intent's anchors require (two bars for every buy
/// intent: the forming bar and the completed one before it).
pub fn derive_payload(
    intent: TradeIntent,
    symbol: &str,
    candles: &CandleSeries,
) -> ControllerResult<Option<BuyPayload>> {
    if intent == TradeIntent::SellAll {
        return Ok(None);
    }

    let (Some(prev), Some(curr)) = (candles.prev(), candles.last()) else {
        return Err(ControllerError::InsufficientData);
    };

    let payload = match intent {
        TradeIntent::OpenStop => BuyPayload {
            price: Some(prev.open + ENTRY_OFFSET),
            trigger_price: Some(prev.open),
            order_type: Some(BuyOrderType::StopLoss),
            exit_price: Some(prev.low - ENTRY_OFFSET),
            cost_price: Some(prev.open + ENTRY_OFFSET),
            ..BuyPayload::for_symbol(symbol)
        },
        TradeIntent::HighStop => BuyPayload {
            price: Some(prev.high + ENTRY_OFFSET),
            trigger_price: Some(prev.high),
            order_type: Some(BuyOrderType::StopLoss),
            exit_price: Some(prev.low),
            cost_price: Some(prev.high + ENTRY_OFFSET),
            ..BuyPayload::for_symbol(symbol)
        },
        TradeIntent::LimitBuy => BuyPayload {
            price: Some(curr.close + LIMIT_OFFSET),
            order_type: Some(BuyOrderType::Limit),
            exit_price: Some(curr.low),
            cost_price: Some(curr.close + ENTRY_OFFSET),
            ..BuyPayload::for_symbol(symbol)
        },
        TradeIntent::HighLowBuy => BuyPayload {
            high: Some(prev.high),
            low: Some(prev.low),
            ..BuyPayload::for_symbol(symbol)
        },
        TradeIntent::SellAll => unreachable!("handled above"),
    };

    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartsync_core::Candle;

    fn series() -> CandleSeries {
        let mut s = CandleSeries::new();
        s.replace_all(vec![
            Candle::new(100, 100.0, 104.0, 98.0, 102.0),
            Candle::new(160, 102.0, 105.0, 101.0, 103.0),
        ]);
        s
    }

    #[test]
    fn test_open_stop_anchors_on_previous_open() {
        let payload = derive_payload(TradeIntent::OpenStop, "X", &series())
            .unwrap()
            .unwrap();
        assert_eq!(payload.symbol, "X");
        assert_eq!(payload.price, Some(100.05));
        assert_eq!(payload.trigger_price, Some(100.0));
        assert_eq!(payload.order_type, Some(BuyOrderType::StopLoss));
        assert_eq!(payload.exit_price, Some(97.95));
        assert_eq!(payload.cost_price, Some(100.05));
        assert!(payload.high.is_none());
        assert!(payload.low.is_none());
    }

    #[test]
    fn test_high_stop_anchors_on_previous_high() {
        let payload = derive_payload(TradeIntent::HighStop, "X", &series())
            .unwrap()
            .unwrap();
        assert_eq!(payload.price, Some(104.05));
        assert_eq!(payload.trigger_price, Some(104.0));
        assert_eq!(payload.exit_price, Some(98.0));
        assert_eq!(payload.cost_price, Some(104.05));
    }

    #[test]
    fn test_limit_buy_anchors_on_current_close() {
        let payload = derive_payload(TradeIntent::LimitBuy, "X", &series())
            .unwrap()
            .unwrap();
        assert_eq!(payload.price, Some(105.0));
        assert_eq!(payload.order_type, Some(BuyOrderType::Limit));
        assert_eq!(payload.exit_price, Some(101.0));
        assert_eq!(payload.cost_price, Some(103.05));
        assert!(payload.trigger_price.is_none());
    }

    #[test]
    fn test_high_low_buy_sends_previous_range_only() {
        let payload = derive_payload(TradeIntent::HighLowBuy, "X", &series())
            .unwrap()
            .unwrap();
        assert_eq!(payload.high, Some(104.0));
        assert_eq!(payload.low, Some(98.0));
        assert!(payload.price.is_none());
        assert!(payload.order_type.is_none());
    }

    #[test]
    fn test_sell_all_has_no_payload() {
        let payload = derive_payload(TradeIntent::SellAll, "X", &CandleSeries::new()).unwrap();
        assert!(payload.is_none());
        assert!(!TradeIntent::SellAll.needs_history());
    }

    #[test]
    fn test_insufficient_history_rejected() {
        let mut one_bar = CandleSeries::new();
        one_bar.replace_all(vec![Candle::new(100, 100.0, 104.0, 98.0, 102.0)]);

        for intent in [
            TradeIntent::OpenStop,
            TradeIntent::HighStop,
            TradeIntent::LimitBuy,
            TradeIntent::HighLowBuy,
        ] {
            assert!(matches!(
                derive_payload(intent, "X", &one_bar),
                Err(ControllerError::InsufficientData)
            ));
            assert!(matches!(
                derive_payload(intent, "X", &CandleSeries::new()),
                Err(ControllerError::InsufficientData)
            ));
        }
    }
}
