use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::cli::OutputOptions;
use crate::display::{render_cards, render_table};
use crate::entity::Entity;
use crate::error::Result;
use crate::list::{ListAction, ListController, ViewMode};
use crate::screen::ListScreen;
use crate::types::TabFilter;

/// Filters and paging for `intered ls`
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    pub search: Option<String>,
    pub tab: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub cards: bool,
}

/// List one page of a collection
pub async fn cmd_ls<E: Entity>(ctx: &AppContext, opts: &LsOptions, output: OutputOptions) -> Result<()> {
    let tab = match &opts.tab {
        Some(tab) => TabFilter::parse::<E::Tab>(tab)?,
        None => TabFilter::All,
    };

    let mut controller = ListController::<E>::new(opts.page_size.unwrap_or(ctx.page_size));
    controller.set_tab(tab);
    if let Some(search) = &opts.search {
        controller.set_search(search.clone());
    }
    if opts.cards {
        controller.set_view_mode(ViewMode::Cards);
    }

    let mut screen = ListScreen::open(ctx.source::<E>(), controller).await?;
    if let Some(page) = opts.page {
        screen.dispatch(ListAction::SetPage(page));
    }

    let view = screen.view();
    let controller = screen.controller();

    let json_output = json!({
        "collection": E::COLLECTION,
        "search": controller.query().search,
        "tab": controller.query().tab.to_string(),
        "page": view.page,
        "page_size": view.page_size,
        "total_pages": view.total_pages,
        "filtered_count": view.filtered_count,
        "total_count": view.total_count,
        "records": view.rows,
    });

    let text_output = if view.is_empty() {
        format!("No {} found. {}", E::COLLECTION, view.range_label().dimmed())
    } else {
        let body = match controller.view_mode() {
            ViewMode::Table => render_table(&view.rows, controller.selected()),
            ViewMode::Cards => render_cards(&view.rows, controller.selected()),
        };
        format!(
            "{body}\n\n{}  {}",
            view.range_label(),
            format!("Page {} of {}", view.page, view.total_pages.max(1)).dimmed()
        )
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}
