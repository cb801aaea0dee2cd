use recipe_pdf::constants::*;
use recipe_pdf::layout::*;
use recipe_pdf::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([90, 160, 60]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn long_record() -> RecipeRecord {
    let ingredients: Vec<String> = (1..=12).map(|i| format!("{} cups ingredient {}", i, i)).collect();
    let instructions: Vec<String> = (1..=9)
        .map(|i| format!("Step {}: stir gently and let it rest for a few minutes", i))
        .collect();
    RecipeRecord {
        title: Some("Weeknight Curry".to_string()),
        ingredients: LineSource::from(ingredients),
        instructions: LineSource::from(instructions),
        ..Default::default()
    }
}

fn layout(record: &RecipeRecord, hero: Option<&HeroImage>) -> RecipeLayout {
    layout_recipe(
        record,
        hero,
        &ExportOptions::default(),
        &KnownIngredients::default(),
    )
}

#[test]
fn test_long_recipe_paginates_with_footers() {
    let result = layout(&long_record(), None);
    let total = result.page_count();
    assert!(total >= 2, "expected at least 2 pages, got {}", total);

    for (index, page) in result.pages.iter().enumerate() {
        let label = format!("Page {} of {}", index + 1, total);
        assert!(page.contains_text(&label), "missing footer {:?}", label);
        assert!(page.contains_text("Exported from Recipe Share"));
    }
}

#[test]
fn test_instructions_continue_on_next_page() {
    let result = layout(&long_record(), None);
    let first_step = result.mark(Section::Instructions).unwrap();
    assert_eq!(first_step.page, 0);

    let last_page = result.pages.last().unwrap();
    assert!(last_page.contains_text("Step 9:"));
    assert!(!result.pages[0].contains_text("Step 9:"));
}

#[test]
fn test_rows_stay_above_footer() {
    let steps: Vec<String> = (1..=30)
        .map(|i| {
            format!(
                "Step {} keeps going with enough words that the line has to wrap across the \
                 available width at least once or twice before it ends",
                i
            )
        })
        .collect();
    let record = RecipeRecord {
        instructions: LineSource::from(steps),
        ..long_record()
    };
    let options = ExportOptions::default();
    let result = layout(&record, None);
    let limit = options.content_bottom_mm() + 1e-3;

    for page in &result.pages {
        for command in &page.commands {
            match command {
                DrawCommand::FillCircle {
                    center_y, radius, ..
                } => assert!(center_y + radius <= limit),
                DrawCommand::Text {
                    baseline, size_pt, ..
                } if *size_pt == BODY_FONT_SIZE => assert!(*baseline <= limit),
                _ => {}
            }
        }
    }
}

#[test]
fn test_empty_lists_with_notes() {
    let record = RecipeRecord {
        title: Some("Mystery Dish".to_string()),
        notes: Some("Ask grandma for the rest.\nServe warm.".to_string()),
        ..Default::default()
    };
    let result = layout(&record, None);

    assert!(result.contains_text("No ingredients listed."));
    assert!(result.contains_text("No instructions provided."));
    assert!(result.mark(Section::Notes).is_some());
    assert!(result.contains_text("NOTES"));
    assert!(result.contains_text("Ask grandma for the rest."));
    assert!(result.contains_text("Serve warm."));
    assert_eq!(result.page_count(), 1);
}

#[test]
fn test_cards_and_meta() {
    let record = RecipeRecord {
        title: Some("Pad Thai".to_string()),
        cuisine: Some("Thai".to_string()),
        category: Some("Dinner".to_string()),
        owner_name: Some("Ana".to_string()),
        prep_time: TimeValue::from(90.0),
        cook_time: TimeValue::from("20 min"),
        servings: Some(4.0),
        difficulty: Some("Easy".to_string()),
        ..Default::default()
    };
    let result = layout(&record, None);

    assert!(result.contains_text("Thai | Dinner"));
    assert!(result.contains_text("By Ana"));
    for label in ["PREP TIME", "COOK TIME", "SERVINGS", "DIFFICULTY"] {
        assert!(result.contains_text(label), "missing card {}", label);
    }
    assert!(result.contains_text("1h 30m"));
    assert!(result.contains_text("20 min"));
    assert!(result.contains_text("Easy"));
}

#[test]
fn test_missing_card_values_show_not_available() {
    let result = layout(&RecipeRecord::default(), None);
    let first_page: Vec<&str> = result.pages[0].texts().collect();
    assert_eq!(first_page.iter().filter(|text| **text == "N/A").count(), 4);
}

#[test]
fn test_ingredient_rows_use_parsed_lines() {
    let record = RecipeRecord {
        ingredients: LineSource::from(vec!["2 cups flour (sifted)", "a pinch of salt"]),
        ..Default::default()
    };
    let known = KnownIngredients::new(["flour"]);
    let result = layout_recipe(&record, None, &ExportOptions::default(), &known);

    assert!(result.contains_text("2 cups Flour (sifted)"));
    assert!(result.contains_text("a pinch of salt"));
}

#[test]
fn test_hero_image_shifts_following_sections() {
    let hero = HeroImage::from_image_bytes(&png_bytes(64, 32), 85).unwrap();
    let record = long_record();

    let without = layout(&record, None);
    let with = layout(&record, Some(&hero));

    assert!(with.hero_drawn);
    assert!(!without.hero_drawn);
    assert!(with.mark(Section::HeroImage).is_some());
    assert!(without.mark(Section::HeroImage).is_none());

    let shift = HERO_IMAGE_HEIGHT_MM + BLOCK_GAP_MM;
    let title_without = without.mark(Section::TitleMeta).unwrap();
    let title_with = with.mark(Section::TitleMeta).unwrap();
    assert!((title_with.y - title_without.y - shift).abs() < 1e-3);

    let image = with.pages[0]
        .commands
        .iter()
        .find_map(|command| match command {
            DrawCommand::Image { rect } => Some(*rect),
            _ => None,
        })
        .unwrap();
    // 2:1 image in a wider area keeps its aspect ratio
    assert!((image.width / image.height - 2.0).abs() < 1e-3);
    assert!(image.height <= HERO_IMAGE_HEIGHT_MM + 1e-3);
}

#[test]
fn test_unloaded_image_matches_no_image_layout() {
    let with_url = RecipeRecord {
        image_url: Some("https://example.invalid/hero.jpg".to_string()),
        ..long_record()
    };
    assert_eq!(layout(&with_url, None), layout(&long_record(), None));
}

#[test]
fn test_sections_render_in_order() {
    let hero = HeroImage::from_image_bytes(&png_bytes(10, 10), 85).unwrap();
    let record = RecipeRecord {
        notes: Some("Freezes well.".to_string()),
        ..long_record()
    };
    let result = layout(&record, Some(&hero));
    let order: Vec<Section> = result.marks.iter().map(|mark| mark.section).collect();
    assert_eq!(
        order,
        vec![
            Section::Header,
            Section::HeroImage,
            Section::TitleMeta,
            Section::InfoCards,
            Section::Ingredients,
            Section::Instructions,
            Section::Notes,
        ]
    );

    // Marks never move backwards
    let positions: Vec<(usize, f32)> = result.marks.iter().map(|m| (m.page, m.y)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_small_paper_still_lays_out() {
    let options = ExportOptions {
        paper_size: PaperSize::A5,
        margin_mm: 10.0,
        ..Default::default()
    };
    assert!(options.validate().is_ok());
    let result = layout_recipe(
        &long_record(),
        None,
        &options,
        &KnownIngredients::default(),
    );
    assert_eq!(result.page_width_mm, 148.0);
    assert!(result.page_count() >= 2);
}
