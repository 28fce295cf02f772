use log::debug;

use crate::catalog::ItemCatalog;
pub use crate::config::*;

/// Averages the item values of each trait.
///
/// Traits come out in the order of their first appearance in the catalog, which
/// is also the order of the radar axes. Items without a trait are skipped.
pub fn trait_averages(
    catalog: &ItemCatalog,
    item_values: &[u32],
) -> Result<Vec<TraitAverage>, SurveyErrors> {
    if item_values.len() != catalog.len() {
        return Err(SurveyErrors::LengthMismatch(
            catalog.len(),
            item_values.len(),
        ));
    }

    // (trait, sum, count), in first appearance order
    let mut groups: Vec<(String, u64, u64)> = Vec::new();
    for (item, value) in catalog.items().iter().zip(item_values.iter()) {
        if let Some(t) = &item.trait_name {
            match groups.iter_mut().find(|(name, _, _)| name == t) {
                Some(g) => {
                    g.1 += *value as u64;
                    g.2 += 1;
                }
                None => groups.push((t.clone(), *value as u64, 1)),
            }
        }
    }

    let res: Vec<TraitAverage> = groups
        .into_iter()
        .map(|(trait_name, sum, count)| TraitAverage {
            trait_name,
            average: sum as f64 / count as f64,
        })
        .collect();
    debug!("trait_averages: {:?}", res);
    Ok(res)
}

/// The mean of each trait across several submissions, weighting every
/// submission equally.
pub fn mean_trait_averages(per_submission: &[Vec<TraitAverage>]) -> Vec<TraitAverage> {
    let mut groups: Vec<(String, f64, u64)> = Vec::new();
    for averages in per_submission.iter() {
        for ta in averages.iter() {
            match groups.iter_mut().find(|(name, _, _)| *name == ta.trait_name) {
                Some(g) => {
                    g.1 += ta.average;
                    g.2 += 1;
                }
                None => groups.push((ta.trait_name.clone(), ta.average, 1)),
            }
        }
    }
    groups
        .into_iter()
        .map(|(trait_name, sum, count)| TraitAverage {
            trait_name,
            average: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            LikertItem::new(Some("Extraversion"), "I am talkative."),
            LikertItem::new(Some("Agreeableness"), "I am considerate."),
            LikertItem::flat("I answered honestly."),
            LikertItem::new(Some("Extraversion"), "I am outgoing."),
        ])
        .unwrap()
    }

    #[test]
    fn two_extraversion_items() {
        let catalog = ItemCatalog::new(vec![
            LikertItem::new(Some("Extraversion"), "I am talkative."),
            LikertItem::new(Some("Extraversion"), "I am outgoing."),
        ])
        .unwrap();
        let res = trait_averages(&catalog, &[6, 4]).unwrap();
        assert_eq!(
            res,
            vec![TraitAverage {
                trait_name: "Extraversion".to_string(),
                average: 5.0
            }]
        );
    }

    #[test]
    fn order_within_trait_does_not_matter() {
        let a = trait_averages(&catalog(), &[3, 2, 7, 5]).unwrap();
        let b = trait_averages(&catalog(), &[5, 2, 1, 3]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].trait_name, "Extraversion");
        assert_eq!(a[0].average, 4.0);
        assert_eq!(a[1].trait_name, "Agreeableness");
        assert_eq!(a[1].average, 2.0);
    }

    #[test]
    fn untagged_items_only() {
        let res = trait_averages(&ItemCatalog::national_identity(), &[1; 8]).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            trait_averages(&catalog(), &[1, 2, 3]),
            Err(SurveyErrors::LengthMismatch(4, 3))
        );
    }

    #[test]
    fn mean_across_submissions() {
        let first = trait_averages(&catalog(), &[3, 2, 7, 5]).unwrap();
        let second = trait_averages(&catalog(), &[1, 4, 7, 1]).unwrap();
        let res = mean_trait_averages(&[first, second]);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].average, 2.5);
        assert_eq!(res[1].average, 3.0);
    }
}
