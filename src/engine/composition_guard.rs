// ==========================================
// 工业固废交换 - 成分合计复核
// ==========================================
// 背景: OFFER 成分合计 ≤ 100% 由建档时校验保证
// 职责: 可选的防御性复核（配置项 matching.verify_composition_sum）
// ==========================================

use crate::domain::listing::CompositionEntry;

/// 成分合计上限（百分比）
pub const COMPOSITION_SUM_LIMIT: f64 = 100.0;

/// 计算成分合计
pub fn composition_total(composition: &[CompositionEntry]) -> f64 {
    composition.iter().map(|entry| entry.percentage).sum()
}

// ==========================================
// CompositionGuard
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionGuard {
    enabled: bool,
    tolerance: f64,
}

impl CompositionGuard {
    pub fn new(enabled: bool, tolerance: f64) -> Self {
        Self {
            enabled,
            tolerance: tolerance.max(0.0),
        }
    }

    /// 不复核（信任数据提供方）
    pub fn disabled() -> Self {
        Self::new(false, 0.0)
    }

    /// 复核成分合计
    ///
    /// # 返回
    /// - Ok(()): 未开启复核，或合计 ≤ 100 + tolerance
    /// - Err(total): 超限时返回实际合计
    pub fn check(&self, composition: &[CompositionEntry]) -> Result<(), f64> {
        if !self.enabled {
            return Ok(());
        }
        let total = composition_total(composition);
        if total > COMPOSITION_SUM_LIMIT + self.tolerance {
            Err(total)
        } else {
            Ok(())
        }
    }
}

impl Default for CompositionGuard {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::HazardTier;

    fn entries(values: &[f64]) -> Vec<CompositionEntry> {
        values
            .iter()
            .enumerate()
            .map(|(i, &percentage)| CompositionEntry {
                listing_id: 1,
                chemical_id: format!("C{}", i),
                chemical_name: format!("Chem {}", i),
                hazard_tier: HazardTier::Low,
                percentage,
            })
            .collect()
    }

    #[test]
    fn test_disabled_guard_trusts_data() {
        let guard = CompositionGuard::disabled();
        assert!(guard.check(&entries(&[80.0, 40.0])).is_ok());
    }

    #[test]
    fn test_enabled_guard_rejects_overflow() {
        let guard = CompositionGuard::new(true, 0.0);
        assert!(guard.check(&entries(&[60.0, 40.0])).is_ok());
        assert_eq!(guard.check(&entries(&[80.0, 40.0])), Err(120.0));
    }

    #[test]
    fn test_tolerance_absorbs_rounding() {
        let guard = CompositionGuard::new(true, 0.5);
        assert!(guard.check(&entries(&[60.2, 40.1])).is_ok());
        assert!(guard.check(&entries(&[60.2, 40.4])).is_err());
    }
}
