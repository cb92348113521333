// ==========================================
// TB CareMap - 行级指标计算引擎
// ==========================================
// 职责: 单条库存观测 → 派生风险/补货指标
// 输入: InventoryObservation
// 输出: DerivedMetrics
// 红线: 纯函数,无副作用,不做输入校验 (负数按算术传播)
// ==========================================

use crate::domain::inventory::{DerivedMetrics, InventoryObservation, SnapshotRow};

/// 月度折算天数 (在治患者数 / 30 = 日需求)
pub const DAYS_PER_MONTH: f64 = 30.0;

/// 补货安全缓冲天数 (补货量覆盖 提前期 + 30 天)
pub const SAFETY_BUFFER_DAYS: f64 = 30.0;

/// 触发库存风险时规划风险分的倍数
pub const FLAGGED_RISK_MULTIPLIER: f64 = 2.0;

// ==========================================
// RowMetricCalculator - 行级指标计算器
// ==========================================
pub struct RowMetricCalculator {
    // 无状态引擎
}

impl RowMetricCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算单行派生指标
    ///
    /// # 规则
    /// - daily_need = tb_cases_active / 30
    /// - daily_need <= 0 时 days_of_therapy_left 不适用 (None)
    /// - stock_risk_flag: 剩余天数 < 提前期; 不适用时恒为 false
    /// - programmatic_risk: 风险时翻倍,否则原样透传 (不封顶)
    /// - suggested_reorder_qty: 风险时 daily_need × (提前期 + 30),否则恰为 0
    pub fn calculate(&self, obs: &InventoryObservation) -> DerivedMetrics {
        let daily_need = obs.tb_cases_active as f64 / DAYS_PER_MONTH;

        let days_of_therapy_left = if daily_need > 0.0 {
            Some(obs.closing_stock / daily_need)
        } else {
            None
        };

        let stock_risk_flag = days_of_therapy_left
            .map(|days| days < obs.lead_time_days)
            .unwrap_or(false);

        let programmatic_risk = if stock_risk_flag {
            obs.tb_risk_score * FLAGGED_RISK_MULTIPLIER
        } else {
            obs.tb_risk_score
        };

        let days_until_stockout_vs_lead = days_of_therapy_left.map(|days| days - obs.lead_time_days);

        let suggested_reorder_qty = if stock_risk_flag {
            daily_need * (obs.lead_time_days + SAFETY_BUFFER_DAYS)
        } else {
            0.0
        };

        DerivedMetrics {
            daily_need,
            days_of_therapy_left,
            stock_risk_flag,
            programmatic_risk,
            days_until_stockout_vs_lead,
            suggested_reorder_qty,
        }
    }

    /// 计算并组合为快照行 (观测按值移入,不原地修改)
    pub fn attach(&self, obs: InventoryObservation) -> SnapshotRow {
        let metrics = self.calculate(&obs);
        SnapshotRow {
            observation: obs,
            metrics,
        }
    }
}

impl Default for RowMetricCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(stock: f64, cases: i64, lead: f64, risk: f64) -> InventoryObservation {
        InventoryObservation {
            location: "Jakarta".to_string(),
            item: "RegimenA".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            closing_stock: stock,
            tb_cases_active: cases,
            lead_time_days: lead,
            tb_risk_score: risk,
        }
    }

    #[test]
    fn test_flagged_row_reorder_formula() {
        let calc = RowMetricCalculator::new();
        let m = calc.calculate(&obs(200.0, 900, 20.0, 6.0));

        assert_eq!(m.daily_need, 30.0);
        let days_left = m.days_of_therapy_left.unwrap();
        assert!((days_left - 200.0 / 30.0).abs() < 1e-9);
        assert!(m.stock_risk_flag);
        assert_eq!(m.suggested_reorder_qty, 1500.0);
        assert_eq!(m.programmatic_risk, 12.0);
        assert!((m.days_until_stockout_vs_lead.unwrap() - (days_left - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unflagged_row_passes_risk_through() {
        let calc = RowMetricCalculator::new();
        let m = calc.calculate(&obs(500.0, 300, 14.0, 6.0));

        assert_eq!(m.daily_need, 10.0);
        assert_eq!(m.days_of_therapy_left, Some(50.0));
        assert!(!m.stock_risk_flag);
        assert_eq!(m.programmatic_risk, 6.0);
        assert_eq!(m.days_until_stockout_vs_lead, Some(36.0));
        assert_eq!(m.suggested_reorder_qty, 0.0);
    }

    #[test]
    fn test_zero_cases_is_never_flagged() {
        let calc = RowMetricCalculator::new();
        for stock in [0.0, 10.0, 100_000.0] {
            for risk in [0.0, 5.0, 10.0] {
                let m = calc.calculate(&obs(stock, 0, 30.0, risk));
                assert_eq!(m.daily_need, 0.0);
                assert_eq!(m.days_of_therapy_left, None);
                assert_eq!(m.days_until_stockout_vs_lead, None);
                assert!(!m.stock_risk_flag);
                assert_eq!(m.suggested_reorder_qty, 0.0);
                assert_eq!(m.programmatic_risk, risk);
            }
        }
    }

    #[test]
    fn test_programmatic_risk_is_unbounded() {
        let calc = RowMetricCalculator::new();
        let m = calc.calculate(&obs(10.0, 300, 14.0, 8.0));
        assert!(m.stock_risk_flag);
        assert_eq!(m.programmatic_risk, 16.0);
    }

    #[test]
    fn test_days_left_equal_to_lead_time_is_not_flagged() {
        let calc = RowMetricCalculator::new();
        // 300 / (300/30) = 30 天,提前期 30 天
        let m = calc.calculate(&obs(300.0, 300, 30.0, 4.0));
        assert_eq!(m.days_of_therapy_left, Some(30.0));
        assert!(!m.stock_risk_flag);
        assert_eq!(m.days_until_stockout_vs_lead, Some(0.0));
    }

    #[test]
    fn test_negative_inputs_propagate() {
        let calc = RowMetricCalculator::new();

        // 负库存: 剩余天数为负,低于提前期
        let m = calc.calculate(&obs(-60.0, 60, 10.0, 3.0));
        assert_eq!(m.days_of_therapy_left, Some(-30.0));
        assert!(m.stock_risk_flag);
        assert_eq!(m.suggested_reorder_qty, 2.0 * 40.0);

        // 负病例数: daily_need <= 0,视为不适用
        let m = calc.calculate(&obs(100.0, -30, 10.0, 3.0));
        assert_eq!(m.daily_need, -1.0);
        assert_eq!(m.days_of_therapy_left, None);
        assert!(!m.stock_risk_flag);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let calc = RowMetricCalculator::new();
        let o = obs(123.0, 77, 21.0, 7.5);
        assert_eq!(calc.calculate(&o), calc.calculate(&o));
    }

    #[test]
    fn test_attach_keeps_observation() {
        let calc = RowMetricCalculator::new();
        let o = obs(200.0, 900, 20.0, 6.0);
        let row = calc.attach(o.clone());
        assert_eq!(row.observation, o);
        assert_eq!(row.metrics, calc.calculate(&o));
    }
}
