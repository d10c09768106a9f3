//! Paginated list of report cards.

use leptos::prelude::*;

use super::context::{ExplorerContext, LIST_TOP_ID, card_dom_id};
use crate::model::{Report, color_of};
use crate::sync::Origin;

/// The current page of the active result, with a pager below it.
///
/// The selected report's card is marked `selected`; its referenced-report
/// chips select those reports in turn.
#[component]
pub fn ReportList() -> impl IntoView {
	let explorer = expect_context::<ExplorerContext>();

	let cards = Memo::new(move |_| {
		explorer.generation.track();
		explorer.page.track();
		explorer.with(|e| e.current_view().to_vec())
	});
	let page_count = Memo::new(move |_| {
		explorer.generation.track();
		explorer.with(|e| e.pagination().page_count())
	});
	let total = Memo::new(move |_| {
		explorer.generation.track();
		explorer.with(|e| e.result().reports.len())
	});

	view! {
		<section class="report-list" id=LIST_TOP_ID>
			<p class="report-count">{move || format!("{} reports", total.get())}</p>
			<Show
				when=move || !cards.get().is_empty()
				fallback=|| view! { <p class="report-list-empty">"No reports match this search."</p> }
			>
				<For
					each=move || cards.get()
					key=|report| report.id
					children=move |report: Report| view! { <ReportCard report=report /> }
				/>
			</Show>
			<nav class="pager">
				<button
					disabled=move || explorer.page.get() == 0
					on:click=move |_| explorer.previous_page()
				>
					"Previous"
				</button>
				<span class="pager-status">
					{move || format!("Page {} of {}", explorer.page.get() + 1, page_count.get())}
				</span>
				<button
					disabled=move || explorer.page.get() + 1 >= page_count.get()
					on:click=move |_| explorer.next_page()
				>
					"Next"
				</button>
			</nav>
		</section>
	}
}

#[component]
fn ReportCard(report: Report) -> impl IntoView {
	let explorer = expect_context::<ExplorerContext>();
	let id = report.id;
	let link = explorer.config().report_link(id);
	let stripe = format!("border-left: 6px solid {};", color_of(&report.title));
	let meta = format!("{} · {}", report.author_line(), report.date.format("%Y-%m-%d"));

	let references = (!report.referenced.is_empty()).then(|| {
		let chips = report
			.referenced
			.iter()
			.map(|&referenced| {
				view! {
					<button
						class="report-reference"
						on:click=move |_| explorer.select(referenced, Origin::Reference)
					>
						{format!("#{referenced}")}
					</button>
				}
			})
			.collect_view();
		view! { <footer class="report-references">"References: " {chips}</footer> }
	});

	view! {
		<article
			class="report-card"
			class:selected=move || explorer.selected.get() == Some(id)
			id=card_dom_id(id)
			style=stripe
		>
			<header>
				<h3>
					<a href=link target="_blank" rel="noopener noreferrer">
						{format!("ATel #{id}: {}", report.title)}
					</a>
				</h3>
				<p class="report-meta">{meta}</p>
			</header>
			<p class="report-body">{report.body}</p>
			{references}
		</article>
	}
}
