//! Generic recipe shown when the model cannot write one.

use crate::slug::slugify;
use crate::types::{RecipeDetail, RecipeIngredient};

pub const FALLBACK_IMAGE_URL: &str = "https://placehold.co/800x600.png";

fn ingredient(name: &str, quantity: &str, unit: &str) -> RecipeIngredient {
    RecipeIngredient {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
    }
}

/// A fixed beginner recipe skeleton. Only the name varies.
pub fn fallback_recipe(name: &str) -> RecipeDetail {
    let name = name.trim();
    let dish = name.to_lowercase();

    RecipeDetail {
        id: slugify(name),
        name: name.to_string(),
        description: format!("This is a simple and yummy {dish}. Easy to make at home."),
        ingredients: vec![
            ingredient("Main food (like Chicken or Potato)", "2", "pieces (medium size)"),
            ingredient("Vegetable (like Onion or Tomato)", "1", "medium size"),
            ingredient("Garlic", "2", "small pieces (cloves)"),
            ingredient("Green leaf (like Coriander or Parsley)", "A little bit", "chopped"),
            ingredient(
                "Powder masala (like Turmeric or Chilli powder)",
                "1",
                "small spoon (teaspoon)",
            ),
            ingredient(
                "Oil (like Sunflower or Groundnut oil)",
                "2",
                "big spoons (tablespoons)",
            ),
            ingredient("Salt", "A little bit", "for taste"),
            ingredient("Black Pepper powder", "A little bit", "for taste (optional)"),
        ],
        instructions: vec![
            format!("Get all your food items ready for making {dish}. Cut the vegetables into small pieces."),
            "Put a cooking pan on the stove. Turn the stove to medium heat.".to_string(),
            "Add the oil to the pan. Wait for 1 minute for the oil to get warm.".to_string(),
            "Put the garlic in the pan. Cook for 1 minute until it smells good.".to_string(),
            "Add the main food (like chicken or potato). Cook for 5-7 minutes. Stir it sometimes."
                .to_string(),
            "Add the vegetables and powder masala. Mix well and cook for 3-4 minutes until the vegetables are a little soft."
                .to_string(),
            "Add salt and pepper if you like. Mix well.".to_string(),
            format!("Put the green leaves on top. Your {dish} is ready! Eat it while it's hot."),
        ],
        prep_time: "About 15 minutes".to_string(),
        cook_time: "About 25 minutes".to_string(),
        servings: "For 2-3 people".to_string(),
        image_url: Some(FALLBACK_IMAGE_URL.to_string()),
        source_image: None,
    }
}
