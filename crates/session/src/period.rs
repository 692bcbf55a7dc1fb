use crate::policy::{Limit, LimitType, SessionConfig};
use crate::{Result, SessionError};
use agw_types::{Address, U256};

/// Function selector of a call, if `data` is long enough to carry one.
pub fn selector_of(data: &[u8]) -> Option<&[u8]> {
    data.get(..4)
}

fn period_id(limit: &Limit, timestamp: u64) -> Result<u64> {
    if limit.limit_type != LimitType::Allowance {
        return Ok(0);
    }
    if limit.period.is_zero() {
        return Err(SessionError::InvalidLimit("allowance with zero period".to_string()));
    }
    let id = U256::from(timestamp) / limit.period;
    Ok(id.low_u64())
}

/// Period ids the session validator expects alongside a transaction:
/// fee limit, value limit of the matched policy, then one per constraint.
///
/// Contract calls are matched against call policies on target and
/// selector, plain transfers against transfer policies on target. The first
/// matching policy wins, as on chain.
pub fn period_ids_for_transaction(
    config: &SessionConfig,
    target: Address,
    selector: Option<&[u8]>,
    timestamp: u64,
) -> Result<Vec<u64>> {
    let mut ids = vec![period_id(&config.fee_limit, timestamp)?];
    
    match selector {
        Some(selector) => {
            let policy = config
                .call_policies
                .iter()
                .find(|p| p.target == target && p.selector.as_slice() == selector)
                .ok_or(SessionError::NoMatchingPolicy)?;
            ids.push(period_id(&policy.value_limit, timestamp)?);
            for constraint in &policy.constraints {
                ids.push(period_id(&constraint.limit, timestamp)?);
            }
        }
        None => {
            let policy = config
                .transfer_policies
                .iter()
                .find(|p| p.target == target)
                .ok_or(SessionError::NoMatchingPolicy)?;
            ids.push(period_id(&policy.value_limit, timestamp)?);
        }
    }
    
    Ok(ids)
}
