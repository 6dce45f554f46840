//! Multi-pass skin resolution.
//!
//! Stage 1 ingests the root file and, depth-first, every `INCLUDE_FILE`
//! target into one flat element list. Stage 2 then runs over the whole
//! list: variable substitution (file-scoped), categorization, category
//! import expansion, address splicing to a fixed point, and escape
//! normalization. Soft errors are reported through [`Diagnostics`] and
//! degrade the offending construct; resolution always continues.

use std::path::{Path, PathBuf};

use tessera_types::diag::Diagnostics;

use crate::element::{Command, Element, StoreKind};
use crate::source::SkinSource;
use crate::tokenize::{tokenize, unescape_markers};

/// Run both stages and return the surviving data rows, categorized and
/// fully resolved, ready for store construction.
pub fn resolve(
    path: &Path,
    source: &dyn SkinSource,
    diag: &mut dyn Diagnostics,
) -> Vec<Element> {
    let mut elements = Vec::new();
    ingest(path, source, &mut elements, diag);

    apply_variables(&mut elements, diag);
    let mut elements = categorize(elements, diag);
    expand_imports(&mut elements, diag);
    resolve_addresses(&mut elements, diag);

    for elem in &mut elements {
        for param in &mut elem.params {
            *param = unescape_markers(param);
        }
    }

    log::debug!(
        "resolved {} data rows from {}",
        elements.len(),
        path.display()
    );
    elements
}

/// Stage 1: read one file line by line, recursing into includes.
///
/// The content-dir context is per file: it starts empty, applies to
/// elements parsed after the directive, and does not leak into included
/// files.
fn ingest(
    path: &Path,
    source: &dyn SkinSource,
    elements: &mut Vec<Element>,
    diag: &mut dyn Diagnostics,
) {
    let display = path.display().to_string();

    let text = match source.read_file(path) {
        Ok(text) => text,
        Err(err) => {
            // Attach the including line's context when there is one.
            match elements.last() {
                Some(last) => diag.report(
                    &last.file,
                    Some(last.line),
                    &format!("can't open skin file \"{display}\": {err}"),
                ),
                None => diag.report(
                    &display,
                    None,
                    &format!("can't open skin file \"{display}\": {err}"),
                ),
            }
            return;
        }
    };

    let mut content_dir = String::new();

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no as u32;
        let Some(mut element) = Element::from_tokens(tokenize(line), &display, line_no) else {
            continue;
        };
        element.content_dir = content_dir.clone();
        let command = element.command.clone();
        let include_target = element.params.first().cloned();
        elements.push(element);

        match command {
            Command::UseContentDir => match include_target {
                Some(dir) => content_dir = dir,
                None => diag.report(&display, Some(line_no), "USE_CONTENTDIR takes a directory"),
            },
            Command::IncludeFile => {
                if elements.last().map(|e| e.params.len()) != Some(1) {
                    diag.report(
                        &display,
                        Some(line_no),
                        "INCLUDE_FILE takes exactly one parameter",
                    );
                } else if let Some(target) = include_target {
                    let parent = path.parent().unwrap_or_else(|| Path::new(""));
                    let included: PathBuf = parent.join(target);
                    ingest(&included, source, elements, diag);
                }
            }
            _ => {}
        }
    }
}

/// Stage 2a: collect `VAR` declarations per source file, drop them, then
/// substitute `$name` parameters from the declaring file's map only.
fn apply_variables(elements: &mut Vec<Element>, diag: &mut dyn Diagnostics) {
    use std::collections::HashMap;

    let mut per_file: HashMap<String, HashMap<String, String>> = HashMap::new();
    for elem in elements.iter() {
        if elem.command != Command::Var {
            continue;
        }
        if elem.params.len() != 2 {
            diag.report(&elem.file, Some(elem.line), "VAR takes a name and a value");
            continue;
        }
        let vars = per_file.entry(elem.file.clone()).or_default();
        if vars.contains_key(&elem.params[0]) {
            diag.report(
                &elem.file,
                Some(elem.line),
                &format!("variable \"{}\" already defined in this file", elem.params[0]),
            );
        } else {
            vars.insert(elem.params[0].clone(), elem.params[1].clone());
        }
    }

    elements.retain(|e| e.command != Command::Var);

    for elem in elements.iter_mut() {
        for param in &mut elem.params {
            if !param.starts_with('$') {
                continue;
            }
            let key = &param[1..];
            match per_file.get(&elem.file).and_then(|vars| vars.get(key)) {
                Some(value) => *param = value.clone(),
                None => {
                    diag.report(
                        &elem.file,
                        Some(elem.line),
                        &format!("can't find variable \"{key}\""),
                    );
                    param.clear();
                }
            }
        }
    }
}

/// Stage 2b: walk the stream tracking the current category context and
/// stamp it onto the surviving data rows and import directives. All
/// structural elements are consumed here.
fn categorize(elements: Vec<Element>, diag: &mut dyn Diagnostics) -> Vec<Element> {
    let mut kind = StoreKind::Value;
    let mut category = String::from("General");
    let mut spritesheet = String::new();

    let mut survivors = Vec::with_capacity(elements.len());
    for mut elem in elements {
        match &elem.command {
            Command::Header(k) => {
                kind = *k;
                category = String::from("General");
                spritesheet.clear();
            }
            Command::Category => match elem.params.first() {
                Some(name) => {
                    category = name.clone();
                    spritesheet.clear();
                }
                None => diag.report(&elem.file, Some(elem.line), "CATEGORY takes a category name"),
            },
            Command::UseSpritesheet => match elem.params.first() {
                Some(path) => spritesheet = path.clone(),
                None => diag.report(
                    &elem.file,
                    Some(elem.line),
                    "USE_SPRITESHEET takes a spritesheet path",
                ),
            },
            _ => {}
        }

        if matches!(elem.command, Command::Data(_) | Command::ImportCategory) {
            elem.kind = kind;
            elem.category = category.clone();
            elem.spritesheet = spritesheet.clone();
            survivors.push(elem);
        }
    }
    survivors
}

/// Stage 2b continued: expand `IMPORT_CATEGORY` directives.
///
/// Import sees only the rows present when categorization ran: copies are
/// taken from a snapshot, so importing a category that was itself filled
/// by an import does not chain transitively.
fn expand_imports(elements: &mut Vec<Element>, diag: &mut dyn Diagnostics) {
    let snapshot = elements.clone();

    let mut expanded = Vec::with_capacity(elements.len());
    for elem in elements.drain(..) {
        if elem.command != Command::ImportCategory {
            expanded.push(elem);
            continue;
        }

        let Some(import_from) = elem.params.first() else {
            diag.report(
                &elem.file,
                Some(elem.line),
                "IMPORT_CATEGORY takes exactly one parameter",
            );
            continue;
        };

        for sub in &snapshot {
            if matches!(sub.command, Command::Data(_))
                && sub.category == *import_from
                && sub.kind == elem.kind
            {
                let mut copy = sub.clone();
                copy.category = elem.category.clone();
                expanded.push(copy);
            }
        }
        // The directive itself is consumed.
    }
    *elements = expanded;
}

/// Stage 2c: splice `@category;name` references to a fixed point.
///
/// Replacement can introduce fresh `@` parameters (from the spliced-in
/// row), so the pass loops until none remain. The pass count is bounded:
/// a reference cycle cannot make progress, and once the bound is hit every
/// remaining address is blanked and reported instead of looping forever.
fn resolve_addresses(elements: &mut Vec<Element>, diag: &mut dyn Diagnostics) {
    let max_passes = elements.len() + 4;

    for _pass in 0..max_passes {
        if !resolve_addresses_pass(elements, diag) {
            return;
        }
    }

    // Whatever still carries a sigil is part of a cycle.
    for elem in elements.iter_mut() {
        let (file, line) = (elem.file.clone(), elem.line);
        for param in &mut elem.params {
            if param.starts_with('@') {
                diag.report(
                    &file,
                    Some(line),
                    &format!("address \"{param}\" never resolved; reference cycle?"),
                );
                param.clear();
            }
        }
    }
}

/// One full sweep; returns true if any `@` parameter was seen.
fn resolve_addresses_pass(elements: &mut Vec<Element>, diag: &mut dyn Diagnostics) -> bool {
    let mut saw_address = false;

    for index in 0..elements.len() {
        let mut param_index = 0;
        while param_index < elements[index].params.len() {
            let param = elements[index].params[param_index].clone();
            if !param.starts_with('@') {
                param_index += 1;
                continue;
            }
            saw_address = true;

            let rest = &param[1..];
            let mut parts = rest.split(';');
            let (target_category, target_name) = match (parts.next(), parts.next()) {
                (Some(c), Some(n)) => (c.to_string(), n.to_string()),
                _ => {
                    diag.report(
                        &elements[index].file,
                        Some(elements[index].line),
                        &format!("malformed address \"{param}\": expected @category;name"),
                    );
                    elements[index].params[param_index].clear();
                    param_index += 1;
                    continue;
                }
            };

            let kind = elements[index].kind;
            let mut insert: Option<Vec<String>> = None;
            for (sub_index, sub) in elements.iter().enumerate() {
                if sub_index == index {
                    continue;
                }
                if sub.data_name() == Some(target_name.as_str())
                    && sub.category == target_category
                    && sub.kind == kind
                {
                    insert = Some(sub.params.clone());
                }
            }

            match insert {
                Some(values) => {
                    let spliced_len = values.len();
                    elements[index]
                        .params
                        .splice(param_index..=param_index, values);
                    // Re-examine the spliced-in values on the next sweep;
                    // skip past them now so one sweep always terminates.
                    param_index += spliced_len.max(1);
                }
                None => {
                    diag.report(
                        &elements[index].file,
                        Some(elements[index].line),
                        &format!("can't find address target \"{param}\""),
                    );
                    elements[index].params[param_index].clear();
                    param_index += 1;
                }
            }
        }
    }

    saw_address
}
