use podwhy_core::{Taint, Toleration, TolerationOperator};

/// Whether one toleration neutralizes one taint
pub fn tolerates(toleration: &Toleration, taint: &Taint) -> bool {
    if toleration.key.as_deref() != Some(taint.key.as_str()) {
        return false;
    }

    if let Some(effect) = &toleration.effect {
        if *effect != taint.effect {
            return false;
        }
    }

    match &toleration.operator {
        TolerationOperator::Exists => true,
        TolerationOperator::Equal => toleration.value.as_deref().unwrap_or("") == taint.value,
        TolerationOperator::Unknown(_) => false,
    }
}

/// Whether the taint keeps a pod with these tolerations off the node
pub fn is_blocking(taint: &Taint, tolerations: &[Toleration]) -> bool {
    taint.effect.blocks_scheduling() && !tolerations.iter().any(|t| tolerates(t, taint))
}
