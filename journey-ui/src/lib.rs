//! Giao diện dashboard hành trình bệnh nhân cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

use chrono::NaiveDateTime;
use journey_core::{DashboardConfig, JourneyTab, TimelineLayout};
use serde::Deserialize;

/// Cấu hình từ phía JS; chỉ ghi đè các trường được truyền vào.
#[derive(Deserialize, Default)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[serde(rename_all = "camelCase")]
struct JsDashboardConfig {
    #[serde(default)]
    timeline_layout: Option<TimelineLayout>,
    #[serde(default)]
    default_tab: Option<JourneyTab>,
    #[serde(default)]
    mobile_breakpoint_px: Option<u32>,
    #[serde(default)]
    show_type_stats: Option<bool>,
    /// Dạng `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default)]
    reference_time: Option<NaiveDateTime>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(layout) = cfg.timeline_layout {
            base.timeline_layout = layout;
        }
        if let Some(tab) = cfg.default_tab {
            base.default_tab = tab;
        }
        if let Some(px) = cfg.mobile_breakpoint_px {
            base.mobile_breakpoint_px = px;
        }
        if let Some(show) = cfg.show_type_stats {
            base.show_type_stats = show;
        }
        if let Some(reference) = cfg.reference_time {
            base.reference_time = Some(reference);
        }
        base
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use crate::{styles, JsDashboardConfig};
    use journey_core::{
        format_date, format_date_time, format_span, format_time, CampaignFilter, DashboardConfig,
        DashboardError, DateRange, Journey, JourneyStats, JourneyTab, JourneyType, Patient,
        PatientFilter, PatientRepository, Step, TimelineLayout,
    };
    use journey_fixtures::load_fixture_repository;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, Document, Element, HtmlInputElement, HtmlSelectElement, Window};
    use yew::events::InputEvent;
    use yew::prelude::*;
    use yew::TargetCast;

    /// Kho dữ liệu được tiêm vào dashboard; so sánh theo con trỏ.
    #[derive(Clone)]
    pub struct RepositoryHandle(Rc<dyn PatientRepository>);

    impl PartialEq for RepositoryHandle {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct DashboardProps {
        pub repository: RepositoryHandle,
        pub config: DashboardConfig,
    }

    #[derive(Clone, Copy, PartialEq)]
    enum MobileView {
        List,
        Detail,
    }

    #[function_component(Dashboard)]
    fn dashboard(props: &DashboardProps) -> Html {
        let DashboardProps { repository, config } = props;

        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let viewport_width = use_state(current_viewport_width);
        {
            let viewport_width = viewport_width.clone();
            use_effect_with((), move |_| {
                let listener = web_sys::window().map(|window| {
                    let closure = Closure::<dyn Fn()>::new(move || {
                        viewport_width.set(current_viewport_width());
                    });
                    if let Err(err) = window
                        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
                    {
                        console::error_1(&err);
                    }
                    (window, closure)
                });

                move || {
                    if let Some((window, closure)) = listener {
                        if let Err(err) = window.remove_event_listener_with_callback(
                            "resize",
                            closure.as_ref().unchecked_ref(),
                        ) {
                            console::error_1(&err);
                        }
                    }
                }
            });
        }

        let filters = use_state(PatientFilter::default);
        let selected_id = use_state(|| None::<String>);
        let mobile_view = use_state(|| MobileView::List);

        let is_mobile = config.is_mobile_width(*viewport_width);
        let filtered = filters.apply(repository.0.patients(), config.reference_now());
        let stats = JourneyStats::compute(filtered.iter().copied());
        let selected = selected_id
            .as_deref()
            .and_then(|id| repository.0.find_by_id(id));

        let on_select = {
            let selected_id = selected_id.clone();
            let mobile_view = mobile_view.clone();
            Callback::from(move |id: String| {
                selected_id.set(Some(id));
                if is_mobile {
                    mobile_view.set(MobileView::Detail);
                }
            })
        };

        let on_back = {
            let mobile_view = mobile_view.clone();
            Callback::from(move |_: MouseEvent| mobile_view.set(MobileView::List))
        };

        let show_list = !is_mobile || *mobile_view == MobileView::List;
        let show_detail = !is_mobile || *mobile_view == MobileView::Detail;

        html! {
            <div class={classes!(
                "journey-root",
                is_mobile.then_some("is-mobile"),
                selected.is_some().then_some("has-selection")
            )}>
                <header class="journey-header">
                    <h1>{"Patient Journey Dashboard"}</h1>
                    <p>{"View and track patient journeys across different campaign types"}</p>
                </header>
                { render_stats(&stats, config.show_type_stats) }
                { render_filters(filters.clone()) }
                <div class="journey-grid">
                    if show_list {
                        <section class="patient-column" aria-live="polite">
                            <h2>{"Patients"}</h2>
                            { render_patient_list(&filtered, selected_id.as_deref(), &on_select) }
                        </section>
                    }
                    if show_detail {
                        <section class="detail-column">
                            {
                                match selected {
                                    Some(patient) => html! {
                                        <PatientDetail
                                            key={patient.id.clone()}
                                            patient={patient.clone()}
                                            layout={config.timeline_layout}
                                            default_tab={config.default_tab}
                                            show_back={is_mobile}
                                            on_back={on_back.clone()}
                                        />
                                    },
                                    None => render_empty_selection(),
                                }
                            }
                        </section>
                    }
                </div>
            </div>
        }
    }

    fn current_viewport_width() -> f64 {
        web_sys::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|width| width.as_f64())
            .unwrap_or(f64::INFINITY)
    }

    fn render_stats(stats: &JourneyStats, show_type_stats: bool) -> Html {
        html! {
            <section class="stats" aria-label="Journey statistics">
                <div class="stats-row">
                    { render_stat_card("Total Patients", stats.total_patients.to_string(), "Number of patients in the system", None) }
                    { render_stat_card("Total Journeys", stats.total_journeys.to_string(), "Total patient journeys", None) }
                    { render_stat_card("Active Journeys", stats.active_journeys.to_string(), "Journeys currently in progress", Some("info")) }
                    { render_stat_card("Completion Rate", format!("{}%", stats.completion_rate), "Percentage of completed journeys", Some("success")) }
                </div>
                if show_type_stats {
                    <div class="stats-row stats-types">
                        {
                            for JourneyType::ALL.into_iter().map(|kind| {
                                let scheme = kind.scheme();
                                html! {
                                    <div
                                        class="stat-card"
                                        data-type={kind.as_str()}
                                        style={format!("--journey-accent: {}", scheme.accent)}
                                    >
                                        <span class="stat-title">{ format!("{} Journeys", scheme.badge) }</span>
                                        <span class="stat-value">{ stats.count_for(kind) }</span>
                                    </div>
                                }
                            })
                        }
                    </div>
                }
            </section>
        }
    }

    fn render_stat_card(
        title: &str,
        value: String,
        description: &str,
        tone: Option<&'static str>,
    ) -> Html {
        html! {
            <div class="stat-card" data-tone={tone}>
                <span class="stat-title">{ title.to_string() }</span>
                <span class="stat-value">{ value }</span>
                <span class="stat-description">{ description.to_string() }</span>
            </div>
        }
    }

    fn render_filters(filters: UseStateHandle<PatientFilter>) -> Html {
        let current = (*filters).clone();
        let on_query = text_callback(filters.clone(), set_query);
        let on_context = text_callback(filters.clone(), set_context);
        let on_campaign = select_callback(filters.clone(), set_campaign);
        let on_date_range = select_callback(filters.clone(), set_date_range);
        let on_reset = {
            let filters = filters.clone();
            Callback::from(move |_: MouseEvent| filters.set(PatientFilter::default()))
        };

        html! {
            <section class="filter-bar" aria-label="Patient filters">
                <div class="filter-search">
                    <input
                        type="search"
                        placeholder="Search patients..."
                        value={current.query.clone()}
                        oninput={on_query}
                        aria-label="Search patients by name, email, phone or identifier"
                    />
                </div>
                <div class="filter-search">
                    <input
                        type="search"
                        placeholder="Search by Context ID..."
                        value={current.context_id.clone()}
                        oninput={on_context}
                        aria-label="Search by context identifier"
                    />
                    <p class="filter-hint">{"Search for patients by context ID, name, or email"}</p>
                </div>
                <label class="filter-select">
                    <span>{"Campaign Type"}</span>
                    <select onchange={on_campaign}>
                        <option value="all" selected={current.campaign == CampaignFilter::All}>{"All Types"}</option>
                        {
                            for JourneyType::ALL.into_iter().map(|kind| html! {
                                <option
                                    value={kind.as_str()}
                                    selected={current.campaign == CampaignFilter::Only(kind)}
                                >
                                    { kind.scheme().badge }
                                </option>
                            })
                        }
                    </select>
                </label>
                <label class="filter-select">
                    <span>{"Date Range"}</span>
                    <select onchange={on_date_range}>
                        {
                            for DateRange::ALL.into_iter().map(|range| html! {
                                <option value={range.as_str()} selected={current.date_range == range}>
                                    { range.label() }
                                </option>
                            })
                        }
                    </select>
                </label>
                <button type="button" class="filter-reset" onclick={on_reset} disabled={current.is_empty()}>
                    {"Reset"}
                </button>
            </section>
        }
    }

    fn set_query(filter: &mut PatientFilter, value: String) {
        filter.query = value;
    }

    fn set_context(filter: &mut PatientFilter, value: String) {
        filter.context_id = value;
    }

    fn set_campaign(filter: &mut PatientFilter, value: &str) -> Result<(), DashboardError> {
        filter.campaign = value.parse()?;
        Ok(())
    }

    fn set_date_range(filter: &mut PatientFilter, value: &str) -> Result<(), DashboardError> {
        filter.date_range = value.parse()?;
        Ok(())
    }

    fn text_callback(
        filters: UseStateHandle<PatientFilter>,
        apply: fn(&mut PatientFilter, String),
    ) -> Callback<InputEvent> {
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let mut next = (*filters).clone();
            apply(&mut next, input.value());
            filters.set(next);
        })
    }

    fn select_callback(
        filters: UseStateHandle<PatientFilter>,
        apply: fn(&mut PatientFilter, &str) -> Result<(), DashboardError>,
    ) -> Callback<Event> {
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let mut next = (*filters).clone();
            match apply(&mut next, &select.value()) {
                Ok(()) => filters.set(next),
                Err(err) => console::warn_1(&JsValue::from_str(&err.to_string())),
            }
        })
    }

    fn render_patient_list(
        patients: &[&Patient],
        selected_id: Option<&str>,
        on_select: &Callback<String>,
    ) -> Html {
        if patients.is_empty() {
            return html! { <p class="empty-state">{"No patients found"}</p> };
        }

        html! {
            <ul class="patient-list">
                {
                    for patients.iter().map(|patient| {
                        let selected = selected_id == Some(patient.id.as_str());
                        render_patient_card(patient, selected, on_select)
                    })
                }
            </ul>
        }
    }

    fn render_patient_card(patient: &Patient, selected: bool, on_select: &Callback<String>) -> Html {
        let onclick = {
            let id = patient.id.clone();
            on_select.reform(move |_: MouseEvent| id.clone())
        };
        let active = patient.active_journey_count();

        html! {
            <li>
                <button
                    type="button"
                    class={classes!("patient-card", selected.then_some("is-selected"))}
                    aria-pressed={selected.to_string()}
                    onclick={onclick}
                >
                    { render_avatar(patient, "avatar-small") }
                    <div class="patient-card-body">
                        <span class="patient-name">{ patient.name.clone() }</span>
                        <span class="patient-meta">{ format!("{}, {}", patient.age, patient.gender) }</span>
                        <span class="patient-contact">{ patient.contact_info.email.clone() }</span>
                        <span class="patient-contact">{ patient.contact_info.phone.clone() }</span>
                        <div class="patient-card-footer">
                            <span class="journey-count">{ format!("{} Journeys", patient.journeys.len()) }</span>
                            if active > 0 {
                                <span class="active-pill">{ format!("{active} Active") }</span>
                            }
                        </div>
                    </div>
                </button>
            </li>
        }
    }

    fn render_avatar(patient: &Patient, class: &'static str) -> Html {
        match patient.avatar.as_ref() {
            Some(url) => html! {
                <img class={classes!("avatar", class)} src={url.clone()} alt={patient.name.clone()} />
            },
            None => html! {
                <span class={classes!("avatar", "avatar-fallback", class)}>{ patient.initials() }</span>
            },
        }
    }

    fn render_empty_selection() -> Html {
        html! {
            <div class="empty-selection">
                <h3>{"No Patient Selected"}</h3>
                <p>{"Select a patient from the list to view their journey details"}</p>
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    struct PatientDetailProps {
        patient: Patient,
        layout: TimelineLayout,
        default_tab: JourneyTab,
        show_back: bool,
        on_back: Callback<MouseEvent>,
    }

    #[function_component(PatientDetail)]
    fn patient_detail(props: &PatientDetailProps) -> Html {
        let default_tab = props.default_tab;
        let tab = use_state(move || default_tab);
        let patient = &props.patient;
        let journeys = (*tab).select(&patient.journeys);

        html! {
            <div class="patient-detail">
                if props.show_back {
                    <button type="button" class="back-button" onclick={props.on_back.clone()}>
                        {"‹ Back to patients"}
                    </button>
                }
                { render_detail_header(patient) }
                <h2 class="journeys-heading">
                    {"Patient Journeys"}
                    <span class="count-pill">{ patient.journeys.len() }</span>
                </h2>
                <div class="journey-tabs" role="tablist">
                    {
                        for JourneyTab::ALL.into_iter().map(|option| {
                            let is_active = *tab == option;
                            let onclick = {
                                let tab = tab.clone();
                                Callback::from(move |_: MouseEvent| tab.set(option))
                            };
                            html! {
                                <button
                                    type="button"
                                    role="tab"
                                    aria-selected={is_active.to_string()}
                                    class={classes!("journey-tab", is_active.then_some("is-active"))}
                                    onclick={onclick}
                                >
                                    { option.label() }
                                </button>
                            }
                        })
                    }
                </div>
                <div class="journey-list" role="tabpanel">
                    if journeys.is_empty() {
                        <p class="empty-state">{ (*tab).empty_label() }</p>
                    } else {
                        { for journeys.into_iter().map(|journey| render_journey(journey, props.layout)) }
                    }
                </div>
            </div>
        }
    }

    fn render_detail_header(patient: &Patient) -> Html {
        html! {
            <header class="detail-header">
                { render_avatar(patient, "avatar-large") }
                <div>
                    <h2 class="detail-name">{ patient.name.clone() }</h2>
                    <p class="patient-meta">{ format!("{}, {}", patient.age, patient.gender) }</p>
                    <div class="detail-contact">
                        <span>{ patient.contact_info.email.clone() }</span>
                        <span>{ patient.contact_info.phone.clone() }</span>
                        {
                            patient.context_id.as_ref().map(|ctx| html! {
                                <span class="context-chip">{ format!("Context {ctx}") }</span>
                            }).unwrap_or_default()
                        }
                    </div>
                </div>
            </header>
        }
    }

    fn render_journey(journey: &Journey, layout: TimelineLayout) -> Html {
        let scheme = journey.kind.scheme();
        let (status_label, status_tone) = journey.status.badge();
        let (done, total) = journey.progress();
        let layout_class = match layout {
            TimelineLayout::Vertical => "layout-vertical",
            TimelineLayout::Horizontal => "layout-horizontal",
        };

        html! {
            <article
                class={classes!("journey-card", layout_class)}
                data-type={journey.kind.as_str()}
                style={format!("--journey-accent: {}", scheme.accent)}
            >
                <header class="journey-card-header">
                    <div class="journey-badges">
                        <span class="type-badge">{ scheme.label }</span>
                        <span class="status-badge" data-tone={status_tone.css_key()}>{ status_label }</span>
                    </div>
                    <h3>{ journey.name.clone() }</h3>
                    <p class="journey-span">{ format_span(journey) }</p>
                    <p class="journey-progress">{ format!("{done}/{total} steps completed") }</p>
                </header>
                {
                    match layout {
                        TimelineLayout::Vertical => render_step_list(&journey.steps),
                        TimelineLayout::Horizontal => render_step_track(&journey.steps),
                    }
                }
            </article>
        }
    }

    fn render_step_marker(step: &Step) -> Html {
        let appearance = step.status.appearance();
        html! {
            <span
                class={classes!("step-marker", appearance.pulse.then_some("is-pulsing"))}
                data-tone={appearance.tone.css_key()}
                aria-hidden="true"
            >
                { appearance.icon.glyph() }
            </span>
        }
    }

    fn step_name_class(step: &Step) -> Classes {
        classes!("step-name", step.status.appearance().strike.then_some("is-skipped"))
    }

    fn render_step_list(steps: &[Step]) -> Html {
        html! {
            <ol class="step-list">
                {
                    for steps.iter().enumerate().map(|(index, step)| html! {
                        <li
                            class="step"
                            data-status={step.status.css_key()}
                            style={format!("animation-delay: {}ms", index * 50)}
                        >
                            { render_step_marker(step) }
                            <div class="step-body">
                                <span class={step_name_class(step)}>{ step.name.clone() }</span>
                                if step.timestamp.is_some() {
                                    <span class="step-time">{ format_date_time(step.timestamp) }</span>
                                }
                                {
                                    step.details.as_ref().map(|detail| html! {
                                        <p class="step-detail">{ detail.clone() }</p>
                                    }).unwrap_or_default()
                                }
                                { step.metadata.as_ref().map(render_metadata).unwrap_or_default() }
                                {
                                    step.actions.as_ref()
                                        .map(|actions| render_actions(actions))
                                        .unwrap_or_default()
                                }
                            </div>
                        </li>
                    })
                }
            </ol>
        }
    }

    fn render_step_track(steps: &[Step]) -> Html {
        html! {
            <ol class="step-track">
                {
                    for steps.iter().map(|step| html! {
                        <li class="track-step" data-status={step.status.css_key()} title={track_tooltip(step)}>
                            { render_step_marker(step) }
                            <span class={step_name_class(step)}>{ step.name.clone() }</span>
                            if step.timestamp.is_some() {
                                <span class="step-time">{ format_time(step.timestamp) }</span>
                            }
                        </li>
                    })
                }
            </ol>
        }
    }

    fn track_tooltip(step: &Step) -> String {
        let mut lines = vec![step.name.clone()];
        if let Some(detail) = &step.details {
            lines.push(detail.clone());
        }
        if step.timestamp.is_some() {
            lines.push(format_date(step.timestamp));
        }
        lines.join("\n")
    }

    fn render_metadata(metadata: &BTreeMap<String, String>) -> Html {
        html! {
            <dl class="step-metadata">
                {
                    for metadata.iter().map(|(key, value)| html! {
                        <>
                            <dt>{ key.clone() }</dt>
                            <dd>{ value.clone() }</dd>
                        </>
                    })
                }
            </dl>
        }
    }

    fn render_actions(actions: &[String]) -> Html {
        html! {
            <div class="step-actions">
                { for actions.iter().map(|action| html! { <span class="step-action">{ action.clone() }</span> }) }
            </div>
        }
    }

    #[wasm_bindgen]
    pub fn mount_dashboard(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                let cfg: JsDashboardConfig = from_value(value)
                    .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
                DashboardConfig::from(cfg)
            }
            _ => DashboardConfig::default(),
        };

        let repository = load_fixture_repository()
            .map_err(|err| JsValue::from_str(&format!("Không nạp được dữ liệu: {err}")))?;

        yew::Renderer::<Dashboard>::with_root_and_props(
            target,
            DashboardProps {
                repository: RepositoryHandle(Rc::new(repository)),
                config,
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_dashboard;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_dashboard(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "journey-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
