//! Plain-text rendering for the terminal.

use std::path::Path;

use recipesnap_core::{RecipeDetail, SavedContent, SavedRecipe, Session};

pub fn notice_text(session: &Session) -> String {
    session
        .notice()
        .map(|notice| notice.message.clone())
        .unwrap_or_else(|| format!("Stopped in the {:?} stage", session.stage()))
}

/// Notices go to stderr so stdout stays clean for piping.
pub fn print_notice(session: &Session) {
    if let Some(notice) = session.notice() {
        eprintln!("{}", notice);
    }
}

pub fn print_ingredients(session: &Session) {
    let Some(ingredients) = session.state().visible_ingredients() else {
        return;
    };
    println!("Ingredients:");
    for name in ingredients.iter() {
        println!("  - {}", name);
    }
}

pub fn print_ideas(session: &Session) {
    let Some(ideas) = session.state().visible_ideas() else {
        return;
    };
    println!("Recipe ideas:");
    for (index, idea) in ideas.iter().enumerate() {
        println!("  {}. {}: {}", index + 1, idea.name, idea.description);
    }
}

pub fn print_recipe(detail: &RecipeDetail) {
    println!("{} [{}]", detail.name, detail.id);
    println!("{}", detail.description);
    println!();
    println!(
        "Prep: {}  Cook: {}  Serves: {}",
        detail.prep_time, detail.cook_time, detail.servings
    );
    println!();
    println!("Ingredients:");
    for ingredient in &detail.ingredients {
        println!(
            "  - {} {} {}",
            ingredient.quantity, ingredient.unit, ingredient.name
        );
    }
    println!();
    println!("Steps:");
    for (index, step) in detail.instructions.iter().enumerate() {
        println!("  {}. {}", index + 1, step);
    }
}

pub fn print_saved(added: bool, path: &Path) {
    if added {
        println!("Saved to {}", path.display());
    } else {
        println!("Already saved in {}", path.display());
    }
}

pub fn print_saved_list(recipes: &[SavedRecipe]) {
    if recipes.is_empty() {
        println!("No saved recipes.");
        return;
    }
    for recipe in recipes {
        let kind = match recipe.content {
            SavedContent::Detail(_) => "recipe",
            SavedContent::Idea { .. } => "idea",
        };
        println!(
            "{}  {} ({}, saved {})",
            recipe.id,
            recipe.name(),
            kind,
            recipe.saved_at.format("%Y-%m-%d %H:%M")
        );
    }
}
