//! Movement and catalogue commands: receive, consume, transfer, add-material, add-category.

use dialoguer::Select;

use crate::cli::args::{parse_number, parse_optional_number, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::format_quantity;
use crate::cli::registry::CommandEntry;
use crate::inventory::NewMaterial;

const RECEIVE_USAGE: &str = "receive <category> <material> <quantity> [--source S] [--remarks R] [--unit U --min N [--unit-size Z]]";
const CONSUME_USAGE: &str =
    "consume <category> <material> <quantity> [--purpose P] [--remarks R]";
const TRANSFER_USAGE: &str =
    "transfer <category> <material> <quantity> [--destination D] [--remarks R]";
const ADD_MATERIAL_USAGE: &str = "add-material <category> <material> <unit> <minimum> [--unit-size Z]";
const ADD_CATEGORY_USAGE: &str = "add-category <name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "receive",
            "Record materials received at the site",
            RECEIVE_USAGE,
            cmd_receive,
        ),
        CommandEntry::new(
            "consume",
            "Record materials used on the project",
            CONSUME_USAGE,
            cmd_consume,
        ),
        CommandEntry::new(
            "transfer",
            "Record materials sent to another site or office",
            TRANSFER_USAGE,
            cmd_transfer,
        ),
        CommandEntry::new(
            "add-material",
            "Start tracking a new material",
            ADD_MATERIAL_USAGE,
            cmd_add_material,
        ),
        CommandEntry::new(
            "add-category",
            "Create an empty material category",
            ADD_CATEGORY_USAGE,
            cmd_add_category,
        ),
    ]
}

/// Arguments shared by every movement command, gathered from the line or prompts.
struct MovementRequest {
    category: String,
    material: String,
    quantity: f64,
    counterpart: String,
    remarks: String,
}

struct MovementForm<'a> {
    usage: &'a str,
    counterpart_option: &'static str,
    counterpart_prompt: &'a str,
    counterpart_default: String,
}

fn cmd_receive(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["source", "remarks", "unit", "min", "unit-size"])?;
    let form = MovementForm {
        usage: RECEIVE_USAGE,
        counterpart_option: "source",
        counterpart_prompt: "Received from",
        counterpart_default: context.config.default_receipt_source.clone(),
    };
    let request = gather_movement(context, &parsed, &form)?;
    let new_material = new_material_details(context, &parsed, &request)?;

    context.engine.receive(
        &request.category,
        &request.material,
        request.quantity,
        &request.counterpart,
        &request.remarks,
        new_material,
    )?;
    report_stock(context, "Received", &request);
    Ok(())
}

fn cmd_consume(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["purpose", "remarks"])?;
    let form = MovementForm {
        usage: CONSUME_USAGE,
        counterpart_option: "purpose",
        counterpart_prompt: "Purpose",
        counterpart_default: String::new(),
    };
    let request = gather_movement(context, &parsed, &form)?;

    context.engine.consume(
        &request.category,
        &request.material,
        request.quantity,
        &request.counterpart,
        &request.remarks,
    )?;
    report_stock(context, "Consumed", &request);
    Ok(())
}

fn cmd_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["destination", "remarks"])?;
    let form = MovementForm {
        usage: TRANSFER_USAGE,
        counterpart_option: "destination",
        counterpart_prompt: "Destination",
        counterpart_default: String::new(),
    };
    let request = gather_movement(context, &parsed, &form)?;

    context.engine.transfer(
        &request.category,
        &request.material,
        request.quantity,
        &request.counterpart,
        &request.remarks,
    )?;
    report_stock(context, "Transferred", &request);
    Ok(())
}

fn cmd_add_material(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["unit-size"])?;
    parsed.expect_positional(4, ADD_MATERIAL_USAGE)?;

    let category = context.resolve_category(parsed.positional[0]);
    let details = NewMaterial {
        unit: parsed.positional[2].to_string(),
        minimum_stock: parse_number("minimum", parsed.positional[3])?,
        unit_size: parse_optional_number("unit size", parsed.option("unit-size"))?,
    };
    let added = context
        .engine
        .add_material(&category, parsed.positional[1], details)?;
    io::print_success(format!(
        "Added `{}` to {} (unit: {}, minimum stock: {}).",
        added.name,
        category,
        added.unit,
        format_quantity(added.minimum_stock)
    ));
    Ok(())
}

fn cmd_add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.expect_positional(1, ADD_CATEGORY_USAGE)?;
    let name = parsed.positional[0].trim();
    context.engine.add_category(name)?;
    io::print_success(format!("Category `{}` created.", name));
    Ok(())
}

fn gather_movement(
    context: &ShellContext,
    parsed: &ParsedArgs<'_>,
    form: &MovementForm<'_>,
) -> Result<MovementRequest, CommandError> {
    let remarks = parsed.option("remarks");
    let counterpart = parsed.option(form.counterpart_option);

    if parsed.positional.is_empty() && context.is_interactive() {
        let category = select_category(context)?;
        let material = io::prompt_text(&context.theme, "Material name")?;
        let quantity = io::prompt_number(&context.theme, "Quantity")?;
        let counterpart = match counterpart {
            Some(value) => value.to_string(),
            None => io::prompt_optional(
                &context.theme,
                form.counterpart_prompt,
                &form.counterpart_default,
            )?,
        };
        let remarks = match remarks {
            Some(value) => value.to_string(),
            None => io::prompt_optional(&context.theme, "Remarks", "")?,
        };
        return Ok(MovementRequest {
            category,
            material: material.trim().to_string(),
            quantity,
            counterpart,
            remarks,
        });
    }

    parsed.expect_positional(3, form.usage)?;
    Ok(MovementRequest {
        category: context.resolve_category(parsed.positional[0]),
        material: parsed.positional[1].trim().to_string(),
        quantity: parse_number("quantity", parsed.positional[2])?,
        counterpart: counterpart
            .map(str::to_string)
            .unwrap_or_else(|| form.counterpart_default.clone()),
        remarks: remarks.unwrap_or_default().to_string(),
    })
}

fn select_category(context: &ShellContext) -> Result<String, CommandError> {
    let names: Vec<&str> = context
        .engine
        .categories()
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    if names.is_empty() {
        return Err(CommandError::InvalidArguments(
            "No categories exist yet. Use `add-category <name>` first.".into(),
        ));
    }
    let index = Select::with_theme(&context.theme)
        .with_prompt("Category")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(names[index].to_string())
}

/// Details for a material the category does not track yet. `None` when the
/// material exists or the category is unknown, leaving the engine to decide.
fn new_material_details(
    context: &ShellContext,
    parsed: &ParsedArgs<'_>,
    request: &MovementRequest,
) -> Result<Option<NewMaterial>, CommandError> {
    let Some(category) = context.engine.category(&request.category) else {
        return Ok(None);
    };
    if category.contains(request.material.trim()) {
        return Ok(None);
    }

    if let (Some(unit), Some(min)) = (parsed.option("unit"), parsed.option("min")) {
        return Ok(Some(NewMaterial {
            unit: unit.to_string(),
            minimum_stock: parse_number("minimum", min)?,
            unit_size: parse_optional_number("unit size", parsed.option("unit-size"))?,
        }));
    }

    if !context.is_interactive() {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not tracked in {}. Pass --unit and --min to add it.",
            request.material, request.category
        )));
    }

    io::print_info(format!(
        "`{}` is new in {}. Enter its details.",
        request.material, request.category
    ));
    let unit = match parsed.option("unit") {
        Some(value) => value.to_string(),
        None => io::prompt_text(&context.theme, "Unit (bags, cft, nos, ...)")?,
    };
    let minimum_stock = match parsed.option("min") {
        Some(value) => parse_number("minimum", value)?,
        None => io::prompt_number(&context.theme, "Minimum stock level")?,
    };
    let unit_size = match parsed.option("unit-size") {
        Some(value) => Some(parse_number("unit size", value)?),
        None => {
            let raw = io::prompt_optional(&context.theme, "Unit size (optional)", "")?;
            parse_optional_number("unit size", Some(raw.as_str()))?
        }
    };
    Ok(Some(NewMaterial {
        unit,
        minimum_stock,
        unit_size,
    }))
}

fn report_stock(context: &ShellContext, verb: &str, request: &MovementRequest) {
    let Some(material) = context
        .engine
        .material(&request.category, &request.material)
    else {
        return;
    };
    io::print_success(format!(
        "{} {} {} of {}. In stock: {} {}.",
        verb,
        format_quantity(request.quantity),
        material.unit,
        material.name,
        format_quantity(material.in_stock),
        material.unit
    ));
    if material.is_low_stock() {
        io::print_warning(format!(
            "{} is at or below its minimum stock level of {} {}.",
            material.name,
            format_quantity(material.minimum_stock),
            material.unit
        ));
    }
}
