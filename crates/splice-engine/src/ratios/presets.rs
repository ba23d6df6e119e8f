//! Built-in ratio sets.

use super::{Expr, RatioDefinition, RatioSet};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Statement field names the built-in ratios read.
pub mod fields {
    /// Market capitalization
    pub const MARKET_CAP: &str = "Market Capitalization";
    /// Net income
    pub const NET_INCOME: &str = "Net Income";
    /// Revenue
    pub const REVENUE: &str = "Revenue";
    /// Shareholders' equity
    pub const EQUITY: &str = "Shareholders Equity";
    /// Total debt
    pub const TOTAL_DEBT: &str = "Total Debt";
    /// Total current assets
    pub const CURRENT_ASSETS: &str = "Total Current Assets";
    /// Inventory
    pub const INVENTORY: &str = "Inventory";
    /// Total current liabilities
    pub const CURRENT_LIABILITIES: &str = "Total Current Liabilities";
    /// Total assets
    pub const TOTAL_ASSETS: &str = "Total Assets";
    /// Income tax expense
    pub const INCOME_TAX: &str = "Income Tax";
    /// Pretax income
    pub const PRETAX_INCOME: &str = "Pretax Income";
    /// Operating income
    pub const OPERATING_INCOME: &str = "Operating Income";
    /// Cash and equivalents
    pub const CASH: &str = "Cash & Cash Equivalents";
    /// Dividend per share
    pub const DIVIDEND_PER_SHARE: &str = "Dividend Per Share";
    /// Daily close
    pub const CLOSE: &str = "Close";
    /// Dividends paid
    pub const DIVIDENDS_PAID: &str = "Dividends Paid";
    /// Net share issuance (negative for buybacks)
    pub const SHARE_ISSUANCE: &str = "Share Issuance / Repurchase";
    /// Operating cash flow
    pub const OPERATING_CASH_FLOW: &str = "Operating Cash Flow";
    /// Free cash flow
    pub const FREE_CASH_FLOW: &str = "Free Cash Flow";
}

/// Named ratio set selectable from configuration and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioPreset {
    /// [`RatioSet::standard`]
    #[default]
    #[display("standard")]
    Standard,
    /// [`RatioSet::with_cash_flow_multiples`]
    #[display("cash-flow")]
    CashFlow,
}

impl RatioPreset {
    /// Build the preset's ratio set.
    pub fn ratio_set(self) -> RatioSet {
        match self {
            Self::Standard => RatioSet::standard(),
            Self::CashFlow => RatioSet::with_cash_flow_multiples(),
        }
    }
}

fn f(name: &str) -> Expr {
    Expr::field(name)
}

fn def(name: &str, expr: Expr) -> RatioDefinition {
    RatioDefinition::new(name, expr)
}

impl RatioSet {
    /// Valuation, leverage, liquidity, efficiency, profitability and
    /// shareholder-return ratios recomputed from statement fields.
    pub fn standard() -> Self {
        use fields::*;

        Self::new(vec![
            def("PE Ratio", f(MARKET_CAP) / f(NET_INCOME)),
            def("PS Ratio", f(MARKET_CAP) / f(REVENUE)),
            def("PB Ratio", f(MARKET_CAP) / f(EQUITY)),
            def("Debt/Equity", f(TOTAL_DEBT) / f(EQUITY)),
            def(
                "Quick Ratio",
                (f(CURRENT_ASSETS) - f(INVENTORY)) / f(CURRENT_LIABILITIES),
            ),
            def("Current Ratio", f(CURRENT_ASSETS) / f(CURRENT_LIABILITIES)),
            def("Asset Turnover", f(REVENUE) / f(TOTAL_ASSETS)),
            def("Return on Equity (ROE)", f(NET_INCOME) / f(EQUITY)),
            def("Return on Assets (ROA)", f(NET_INCOME) / f(TOTAL_ASSETS)),
            def(
                "Tax Rate",
                (f(INCOME_TAX) / f(PRETAX_INCOME)).fill_null(0.0),
            ),
            def(
                "NOPAT",
                f(OPERATING_INCOME) * (Expr::constant(1.0) - f("Tax Rate")),
            ),
            def(
                "Invested Capital",
                f(TOTAL_DEBT) + f(EQUITY) - f(CASH),
            ),
            def(
                "Return on Invested Capital (ROIC)",
                f("NOPAT") / f("Invested Capital"),
            ),
            def("Dividend Yield", f(DIVIDEND_PER_SHARE) / f(CLOSE)),
            def("Payout Ratio", (f(DIVIDENDS_PAID) / f(NET_INCOME)).abs()),
            def("Buyback Yield", f(SHARE_ISSUANCE) / f(MARKET_CAP)),
        ])
    }

    /// The standard set plus price to free and operating cash flow.
    pub fn with_cash_flow_multiples() -> Self {
        use fields::*;

        let mut set = Self::standard();
        set.push(def("P/FCF Ratio", f(MARKET_CAP) / f(FREE_CASH_FLOW)));
        set.push(def("P/OCF Ratio", f(MARKET_CAP) / f(OPERATING_CASH_FLOW)));
        set
    }
}
