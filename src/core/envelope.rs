use crate::input::{ComponentKind, EnvelopeComponent};

impl EnvelopeComponent {
    /// U·A product of the component, in W/K.
    pub fn conductance(&self) -> f64 {
        self.u_value * self.area
    }

    pub fn is_glazing(&self) -> bool {
        matches!(self.kind, ComponentKind::Glazing)
    }
}

/// Whole-fabric conduction term: the sum of U·A over every envelope
/// component, in W/K.
pub fn fabric_conductance(components: &[EnvelopeComponent]) -> f64 {
    components.iter().map(EnvelopeComponent::conductance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Orientation;
    use approx::assert_relative_eq;
    use rstest::*;

    #[fixture]
    fn components() -> Vec<EnvelopeComponent> {
        vec![
            EnvelopeComponent {
                name: "Walls".into(),
                kind: ComponentKind::Opaque,
                orientation: None,
                area: 120.,
                u_value: 0.3,
            },
            EnvelopeComponent {
                name: "Roof".into(),
                kind: ComponentKind::Opaque,
                orientation: None,
                area: 80.,
                u_value: 0.15,
            },
            EnvelopeComponent {
                name: "South windows".into(),
                kind: ComponentKind::Glazing,
                orientation: Some(Orientation::South),
                area: 10.,
                u_value: 1.8,
            },
        ]
    }

    #[rstest]
    fn should_sum_ua_products_over_all_components(components: Vec<EnvelopeComponent>) {
        assert_relative_eq!(fabric_conductance(&components), 36. + 12. + 18.);
    }

    #[rstest]
    fn should_identify_glazing(components: Vec<EnvelopeComponent>) {
        assert!(!components[0].is_glazing());
        assert!(components[2].is_glazing());
    }
}
