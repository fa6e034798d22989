use plan_schema::{LegendEntry, ResourceNode, ResourceType};

/// Distinct resource types across `nodes` in first-seen order.
///
/// With no nodes at all the full fixed code set is returned instead.
pub fn derive_legend(nodes: &[ResourceNode]) -> Vec<LegendEntry> {
    if nodes.is_empty() {
        return ResourceType::ALL
            .into_iter()
            .map(LegendEntry::for_type)
            .collect();
    }

    let mut seen: Vec<ResourceType> = Vec::with_capacity(ResourceType::ALL.len());
    for kind in nodes.iter().flat_map(|node| node.types.iter().copied()) {
        if !seen.contains(&kind) {
            seen.push(kind);
        }
    }
    seen.into_iter().map(LegendEntry::for_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, types: Vec<ResourceType>) -> ResourceNode {
        ResourceNode {
            id: id.to_string(),
            label: id.to_string(),
            lat: 0.0,
            lng: 0.0,
            types,
        }
    }

    fn codes(legend: &[LegendEntry]) -> Vec<ResourceType> {
        legend.iter().map(|entry| entry.kind).collect()
    }

    #[test]
    fn legend_follows_first_seen_order() {
        let nodes = vec![
            node("N0", vec![ResourceType::A, ResourceType::C]),
            node("N1", vec![ResourceType::D]),
        ];
        assert_eq!(
            codes(&derive_legend(&nodes)),
            vec![ResourceType::A, ResourceType::C, ResourceType::D]
        );
    }

    #[test]
    fn repeated_types_appear_once() {
        let nodes = vec![
            node("N0", vec![ResourceType::E, ResourceType::A]),
            node("N1", vec![ResourceType::A, ResourceType::E, ResourceType::B]),
        ];
        assert_eq!(
            codes(&derive_legend(&nodes)),
            vec![ResourceType::E, ResourceType::A, ResourceType::B]
        );
    }

    #[test]
    fn no_nodes_yields_full_legend() {
        let legend = derive_legend(&[]);
        assert_eq!(codes(&legend), ResourceType::ALL.to_vec());
        assert_eq!(legend[0].label, "Hydration");
    }

    #[test]
    fn nodes_without_types_contribute_nothing() {
        let nodes = vec![node("N0", Vec::new()), node("N1", vec![ResourceType::F])];
        assert_eq!(codes(&derive_legend(&nodes)), vec![ResourceType::F]);
    }
}
