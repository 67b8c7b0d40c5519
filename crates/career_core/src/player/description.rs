//! Fan descriptions such as "pacey Striker" or "promising Centre Back".

use super::rating::Rateable;
use crate::models::nation::NationId;
use crate::world::World;

/// Candidate labels with their scores; the best score wins, earlier
/// entries win ties.
pub fn description_scores<P: Rateable + ?Sized>(
    player: &P,
    age: u32,
    secondary_positions: usize,
    nationality: &str,
) -> Vec<(String, f64)> {
    let age = age as f64;
    let a = player.attributes();
    vec![
        ("young".to_string(), 3.0 - (age - 16.0).powi(2) / 3.0),
        ("promising".to_string(), 3.0 - (age - 18.0).powi(2) / 2.0),
        ("veteran".to_string(), 1.3f64.powf(age - 33.0)),
        ("pacey".to_string(), a.margin_over_rest(0) / 5.0),
        ("lethal".to_string(), a.margin_over_rest(1) / 3.0),
        ("creative".to_string(), a.margin_over_rest(2) / 3.0),
        ("skillful".to_string(), a.margin_over_rest(3) / 3.0),
        ("tenacious".to_string(), a.margin_over_rest(4) / 3.0),
        ("robust".to_string(), a.margin_over_rest(5) / 5.0),
        ("versatile".to_string(), (secondary_positions as f64).powf(1.5) / 3.0),
        (nationality.to_string(), 1.0),
    ]
}

/// Best label followed by the primary position's name. `None` when no
/// positions are loaded.
pub fn fan_description<P: Rateable + ?Sized>(
    world: &World,
    player: &P,
    age: u32,
    nation: NationId,
) -> Option<String> {
    let model = world.rating_model();
    let primary = world.position(model.primary(player)?)?;
    let secondary = model.secondary(player).len();
    let nationality = world.nation(nation).map(|n| n.nationality.as_str()).unwrap_or_default();

    let label = description_scores(player, age, secondary, nationality)
        .into_iter()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(label, _)| label)?;
    Some(format!("{} {}", label, primary.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{Attributes, Foot};
    use crate::player::rating::Candidate;

    fn best(scores: Vec<(String, f64)>) -> String {
        scores.into_iter().reduce(|b, c| if c.1 > b.1 { c } else { b }).unwrap().0
    }

    #[test]
    fn test_sixteen_year_old_is_young() {
        let attrs = Attributes::from_array([50.0; 6]);
        let p = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(best(description_scores(&p, 16, 0, "Spanish")), "young");
    }

    #[test]
    fn test_dominant_shooting_is_lethal() {
        let attrs = Attributes::from_array([60.0, 80.0, 55.0, 60.0, 30.0, 60.0]);
        let p = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(best(description_scores(&p, 26, 0, "Spanish")), "lethal");
    }

    #[test]
    fn test_veteran_and_nationality_fallback() {
        let attrs = Attributes::from_array([50.0; 6]);
        let p = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(best(description_scores(&p, 26, 0, "Spanish")), "Spanish");
        assert_eq!(best(description_scores(&p, 38, 0, "Spanish")), "veteran");
    }

    #[test]
    fn test_many_secondary_positions_is_versatile() {
        let attrs = Attributes::from_array([50.0; 6]);
        let p = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(best(description_scores(&p, 26, 3, "Spanish")), "versatile");
    }
}
