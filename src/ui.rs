//! Terminal rendering of a [`RenderState`] frame

use ratatui::{prelude::*, widgets::*};

use crate::app::state::ToastKind;
use crate::messages::ui_events::{AppTab, InputField, InputMode};
use crate::messages::RenderState;
use crate::models::{format_price, Audience, LeadScore};
use crate::query::QueryState;
use crate::screens::admin::broadcast::audience_label;
use crate::screens::admin::{events, funnel, home};
use crate::screens::customer::course::{all_completed, overall_progress, ModuleBadge};
use crate::screens::customer::payment::BENEFITS;
use crate::screens::customer::referral::{balance_branch, progress_to_free, BalanceBranch};
use crate::screens::customer::dashboard;

/// Draw one full frame
pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    let content = main_chunks[1];
    let q = &state.queries;
    match state.active_tab {
        AppTab::Dashboard => draw_dashboard(f, state, content),
        AppTab::Course => draw_course(f, state, content),
        AppTab::Payment => draw_payment(f, state, content),
        AppTab::Referral => draw_referral(f, state, content),
        AppTab::Home => draw_query(f, content, " Overview ", &q.admin_stats, draw_home),
        AppTab::Funnel => draw_query(f, content, " Funnel ", &q.funnel, |f, area, steps| {
            draw_funnel(f, area, steps)
        }),
        AppTab::Events => draw_query(f, content, " Events ", &q.events, draw_events),
        AppTab::Users => draw_users(f, state, content),
        AppTab::Broadcast => draw_broadcast(f, state, content),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

/// Renders tabs
pub fn render_tabs<'a>(titles: Vec<String>, selected: usize) -> Tabs<'a> {
    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tabs = state.tabs();
    let titles = tabs
        .iter()
        .enumerate()
        .map(|(i, t)| format!(" {}:{} ", i + 1, t.title()))
        .collect();
    let selected = tabs.iter().position(|t| *t == state.active_tab).unwrap_or(0);
    f.render_widget(render_tabs(titles, selected), area);
}

/// Loading and error placeholders around a screen body
fn draw_query<T>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    query: &QueryState<T>,
    body: impl FnOnce(&mut Frame, Rect, &T),
) {
    match query {
        QueryState::Ready(data) => body(f, area, data),
        QueryState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
            ];
            let block = Block::default().borders(Borders::ALL).title(title.to_string());
            f.render_widget(Paragraph::new(text).block(block), area);
        }
        QueryState::Idle | QueryState::Loading => {
            let block = Block::default().borders(Borders::ALL).title(title.to_string());
            let text = Span::styled("Loading...", Style::default().fg(Color::DarkGray));
            f.render_widget(Paragraph::new(text).block(block), area);
        }
    }
}

fn field_line<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn editing_style(state: &RenderState, field: InputField) -> Style {
    if state.input_mode == InputMode::Editing(field) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

// ========================
// Customer app
// ========================

fn draw_dashboard(f: &mut Frame, state: &RenderState, area: Rect) {
    draw_query(f, area, " Dashboard ", &state.queries.profile, |f, area, profile| {
        let subscription_color = if profile.has_active_subscription() {
            Color::Green
        } else {
            Color::Red
        };
        let lines = vec![
            Line::from(Span::styled(dashboard::greeting(profile), Style::default().bold())),
            Line::from(""),
            field_line("Telegram ID", profile.telegram_id.to_string()),
            field_line(
                "Age",
                profile.age.map(|a| a.to_string()).unwrap_or_else(|| String::from("-")),
            ),
            field_line("Goal", dashboard::goal_label(profile.goal_tag.as_deref()).to_string()),
            field_line("Level", dashboard::level_label(profile.level_tag.as_deref()).to_string()),
            field_line(
                "Segment",
                format!(
                    "{} (score {})",
                    dashboard::segment_label(&profile.lead_segment),
                    profile.lead_score
                ),
            ),
            Line::from(vec![
                Span::styled(format!("{:<16}", "Subscription"), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    dashboard::subscription_badge(profile),
                    Style::default().fg(subscription_color).bold(),
                ),
            ]),
            field_line(
                "Registered",
                profile.registered_at.clone().unwrap_or_else(|| String::from("-")),
            ),
            Line::from(""),
            Line::from(Span::styled(
                dashboard::next_action(profile),
                Style::default().fg(Color::Cyan),
            )),
        ];
        let block = Block::default().borders(Borders::ALL).title(" Dashboard ");
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
    });
}

fn draw_course(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = &state.screens.course;
    draw_query(f, area, " Course ", &state.queries.course_modules, |f, area, modules| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let (done, total, pct) = overall_progress(modules);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(pct.round().clamp(0.0, 100.0) as u16)
            .label(format!("{}/{} modules", done, total));
        f.render_widget(gauge, chunks[0]);

        if let Some(module) = screen.active.and_then(|id| modules.iter().find(|m| m.id == id)) {
            let mut lines = vec![
                Line::from(Span::styled(module.title.clone(), Style::default().bold())),
                Line::from(""),
            ];
            if let Some(description) = &module.description {
                lines.push(Line::from(description.clone()));
                lines.push(Line::from(""));
            }
            if let Some(url) = &module.video_url {
                lines.push(field_line("Video", url.clone()));
            }
            lines.push(field_line("Status", ModuleBadge::of(module).text()));
            lines.push(Line::from(""));
            let hint = if screen.completing {
                "Saving progress..."
            } else if module.is_completed {
                "Esc: back"
            } else {
                "c: mark as completed | Esc: back"
            };
            lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" Module {} ", module.order));
            f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), chunks[1]);
            return;
        }

        let items: Vec<ListItem> = modules
            .iter()
            .map(|m| {
                let badge = ModuleBadge::of(m);
                let color = match badge {
                    ModuleBadge::Completed => Color::Green,
                    ModuleBadge::Locked => Color::DarkGray,
                    ModuleBadge::InProgress(_) => Color::Yellow,
                    ModuleBadge::Start => Color::Cyan,
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:>2}. {:<40} ", m.order, m.title)),
                    Span::styled(badge.text(), Style::default().fg(color)),
                ]))
            })
            .collect();
        let title = if all_completed(modules) {
            " Modules - all completed, congratulations! "
        } else {
            " Modules (Enter: open) "
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(screen.cursor));
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    });
}

fn draw_payment(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = &state.screens.payment;
    draw_query(f, area, " Subscription ", &state.queries.profile, |f, area, profile| {
        let block = Block::default().borders(Borders::ALL).title(" Subscription ");
        if profile.has_active_subscription() {
            let lines = vec![
                Line::from(Span::styled(
                    "Your club subscription is active",
                    Style::default().fg(Color::Green).bold(),
                )),
                Line::from(""),
                Line::from("All lessons and the community are open to you."),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} so'm / month", format_price(screen.display_price())),
                Style::default().bold(),
            )),
        ];
        if let Some(discount) = screen.discount() {
            lines.push(Line::from(Span::styled(
                format!("Referral discount: -{} so'm", format_price(discount)),
                Style::default().fg(Color::Green),
            )));
        }
        lines.push(Line::from(""));
        for benefit in BENEFITS {
            lines.push(Line::from(format!("  + {}", benefit)));
        }
        lines.push(Line::from(""));

        let provider_span = |p: crate::models::PaymentProvider| {
            let style = if p == screen.provider {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(format!(" {} ", p.as_str()), style)
        };
        lines.push(Line::from(vec![
            Span::raw("Provider: "),
            provider_span(crate::models::PaymentProvider::Click),
            Span::raw(" "),
            provider_span(crate::models::PaymentProvider::Payme),
        ]));
        lines.push(Line::from(""));
        let action = if screen.processing {
            Span::styled("Preparing payment...", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("p: switch provider | s: pay", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(action));
        if let Some(payment) = &screen.last_payment {
            lines.push(Line::from(""));
            lines.push(field_line("Payment page", payment.payment_url.clone()));
        }

        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
    });
}

fn draw_referral(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = &state.screens.referral;
    draw_query(f, area, " Invite ", &state.queries.referral_stats, |f, area, stats| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let copy_hint = if screen.copied { "copied" } else { "y: copy" };
        let branch = match balance_branch(stats) {
            BalanceBranch::Sufficient => Span::styled(
                "Your balance covers a free month!",
                Style::default().fg(Color::Green).bold(),
            ),
            BalanceBranch::NeedMore(amount) => Span::raw(format!(
                "{} so'm more for a free month",
                format_price(amount)
            )),
        };
        let lines = vec![
            field_line("Your link", stats.referral_link.clone()),
            Line::from(Span::styled(format!("{:<16}{}", "", copy_hint), Style::default().fg(Color::DarkGray))),
            Line::from(""),
            field_line("Invited", stats.total_invited.to_string()),
            field_line("Valid", stats.valid_referrals.to_string()),
            field_line("Paid", stats.paid_referrals.to_string()),
            field_line("Balance", format!("{} so'm", format_price(stats.balance))),
            Line::from(""),
            Line::from(branch),
        ];
        let block = Block::default().borders(Borders::ALL).title(" Invite friends ");
        f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

        let pct = progress_to_free(stats);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Towards a free month "))
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(pct.round().clamp(0.0, 100.0) as u16);
        f.render_widget(gauge, chunks[1]);
    });
}

// ========================
// Admin dashboard
// ========================

fn draw_home(f: &mut Frame, area: Rect, stats: &crate::models::AdminStats) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let cards = home::kpi_cards(stats);
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len().max(1) as u32); cards.len()])
        .split(chunks[0]);
    for (card, card_area) in cards.iter().zip(card_areas.iter()) {
        let block = Block::default().borders(Borders::ALL).title(format!(" {} ", card.label));
        let value = Paragraph::new(Span::styled(card.value.clone(), Style::default().bold()))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(value, *card_area);
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let revenue: Vec<ListItem> = stats
        .revenue_chart_7d
        .iter()
        .map(|p| ListItem::new(format!("{:<6} {:>12} so'm", p.day, format_price(p.revenue))))
        .collect();
    f.render_widget(
        List::new(revenue).block(Block::default().borders(Borders::ALL).title(" Revenue, 7 days ")),
        bottom[0],
    );

    let activity: Vec<ListItem> = stats
        .recent_activity
        .iter()
        .map(|a| {
            let color = match a.kind.as_str() {
                "payment" => Color::Green,
                "register" => Color::Cyan,
                _ => Color::Gray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8} ", a.time), Style::default().fg(Color::DarkGray)),
                Span::styled(a.text.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(activity).block(Block::default().borders(Borders::ALL).title(" Recent activity ")),
        bottom[1],
    );
}

fn draw_funnel(f: &mut Frame, area: Rect, steps: &[crate::models::FunnelStep]) {
    let rows = funnel::funnel_rows(steps);
    let bar_width = area.width.saturating_sub(48).max(10) as f64;

    let mut lines: Vec<Line> = Vec::new();
    for row in &rows {
        let filled = (row.width_pct / 100.0 * bar_width).round() as usize;
        let dropoff = row
            .dropoff
            .map(|d| format!(" -{:.1}%", d))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::raw(format!("{:<18} ", row.label)),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
            Span::raw(format!(" {} ({:.1}%)", format_price(row.users), row.rate)),
            Span::styled(dropoff, Style::default().fg(Color::Red)),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(conversion) = funnel::overall_conversion(steps) {
        lines.push(field_line("Conversion", format!("{:.1}%", conversion)));
    }
    if let Some(row) = funnel::biggest_loss(&rows) {
        lines.push(field_line(
            "Biggest loss",
            format!("{} (-{:.1}%)", row.label, row.dropoff.unwrap_or(0.0)),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title(" Funnel ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_events(f: &mut Frame, area: Rect, stats: &crate::models::EventStats) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let buttons: Vec<ListItem> = events::top_buttons(stats)
        .into_iter()
        .map(|b| {
            let trend = b.trend.clone().unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<24} {:>6} ", b.name, b.clicks)),
                Span::styled(trend, Style::default().fg(Color::Green)),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(buttons).block(Block::default().borders(Borders::ALL).title(" Top buttons ")),
        left[0],
    );

    let sources: Vec<ListItem> = stats
        .traffic_sources
        .iter()
        .map(|s| ListItem::new(format!("{:<20} {:>5.1}%", s.name, s.value)))
        .collect();
    f.render_widget(
        List::new(sources).block(Block::default().borders(Borders::ALL).title(" Traffic sources ")),
        left[1],
    );

    for (title, segments, target) in [
        (" Goals ", &stats.segment_goal, right[0]),
        (" Levels ", &stats.segment_level, right[1]),
    ] {
        let items: Vec<ListItem> = events::segment_shares(segments)
            .into_iter()
            .map(|(name, count, share)| {
                ListItem::new(format!("{:<20} {:>6} {:>5.1}%", name, count, share))
            })
            .collect();
        f.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
            target,
        );
    }
}

fn score_color(score: LeadScore) -> Color {
    match score {
        LeadScore::Hot => Color::Red,
        LeadScore::Nurture => Color::Yellow,
        LeadScore::Cold => Color::Blue,
    }
}

fn draw_users(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = &state.screens.crm;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search = Paragraph::new(screen.search.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(editing_style(state, InputField::CrmSearch))
            .title(format!(" Search (/) | score: {} (f) ", screen.filter.label())),
    );
    f.render_widget(search, chunks[0]);
    if state.input_mode == InputMode::Editing(InputField::CrmSearch) {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + screen.search.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    draw_query(f, chunks[1], " Users ", &state.queries.users, |f, area, users| {
        let filtered = screen.filtered(users);
        let items: Vec<ListItem> = filtered
            .iter()
            .map(|u| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("#{:<6} {:<24} ", u.id, u.name)),
                    Span::styled(
                        format!("{:<8}", u.score.as_str()),
                        Style::default().fg(score_color(u.score)),
                    ),
                    Span::raw(format!(" {:<8} {}", u.status.as_str(), u.source)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Users ({}/{}) ", filtered.len(), users.len())),
            )
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(screen.cursor));
        f.render_stateful_widget(list, area, &mut list_state);

        if let Some(user) = screen.selected_user(users) {
            let popup_area = centered_rect(60, 60, area);
            let mut lines = vec![
                Line::from(Span::styled(user.name.clone(), Style::default().bold())),
                field_line("ID", user.id.to_string()),
                field_line("Phone", user.phone.clone()),
                Line::from(vec![
                    Span::styled(format!("{:<16}", "Score"), Style::default().fg(Color::DarkGray)),
                    Span::styled(user.score.as_str(), Style::default().fg(score_color(user.score))),
                ]),
                field_line("Status", user.status.as_str().to_string()),
                field_line("Source", user.source.clone()),
                Line::from(""),
                Line::from(Span::styled("Timeline", Style::default().bold())),
            ];
            for event in &user.events {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14} ", event.time), Style::default().fg(Color::DarkGray)),
                    Span::raw(event.action.clone()),
                ]));
            }
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" User (Esc: close) ")
                .style(Style::default().bg(Color::Black));
            f.render_widget(Clear, popup_area);
            f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), popup_area);
        }
    });
}

fn draw_broadcast(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = &state.screens.broadcast;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let composer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Audience
            Constraint::Min(5),    // Message
            Constraint::Length(3), // Media
            Constraint::Length(5), // Buttons
            Constraint::Length(1), // Send
        ])
        .split(columns[0]);

    let counts = state.queries.audience_counts.data();
    let audiences: Vec<Span> = Audience::ALL
        .iter()
        .map(|a| {
            let style = if *a == screen.audience {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(format!(" {} ", audience_label(*a, counts)), style)
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(audiences))
            .block(Block::default().borders(Borders::ALL).title(" Audience (a/A) ")),
        composer[0],
    );

    f.render_widget(
        Paragraph::new(screen.message.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(editing_style(state, InputField::BroadcastMessage))
                    .title(" Message (e) "),
            ),
        composer[1],
    );

    let media_text = if screen.uploading {
        Span::styled(format!("Uploading {}...", screen.media_path), Style::default().fg(Color::Yellow))
    } else if let Some(media) = &screen.media {
        Span::styled(format!("{} (x: remove)", media.file_name), Style::default().fg(Color::Green))
    } else if state.input_mode == InputMode::Editing(InputField::MediaPath) {
        Span::raw(screen.media_path.clone())
    } else {
        Span::styled("No media", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        Paragraph::new(media_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(editing_style(state, InputField::MediaPath))
                .title(" Media file path (m) "),
        ),
        composer[2],
    );

    let mut button_lines: Vec<Line> = screen
        .buttons
        .iter()
        .map(|b| Line::from(format!("[{}] {}", b.text, b.url)))
        .collect();
    if state.input_mode == InputMode::Editing(InputField::ButtonSpec) {
        button_lines.push(Line::from(Span::styled(
            format!("+ {}", screen.button_spec),
            Style::default().fg(Color::Yellow),
        )));
    }
    f.render_widget(
        Paragraph::new(button_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(editing_style(state, InputField::ButtonSpec))
                .title(" Buttons (b: add 'Label | url', B: clear) "),
        ),
        composer[3],
    );

    let send = if screen.sending {
        Span::styled(" Sending...", Style::default().fg(Color::Yellow))
    } else if screen.can_send() {
        Span::styled(" s: send broadcast", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(" s: send (write a message or attach media)", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(send), composer[4]);

    let title = if state.polling {
        " History (refreshing) "
    } else {
        " History (Enter: details) "
    };
    draw_query(f, columns[1], title, &state.queries.broadcasts, |f, area, history| {
        let items: Vec<ListItem> = history
            .iter()
            .map(|b| {
                let color = match b.status.as_str() {
                    "completed" => Color::Green,
                    "failed" | "cancelled" => Color::Red,
                    _ => Color::Yellow,
                };
                let mut lines = vec![Line::from(vec![
                    Span::raw(format!("{:<24} {:<12} ", b.title, b.date)),
                    Span::styled(b.status.clone(), Style::default().fg(color)),
                ])];
                if screen.expanded == Some(b.id) {
                    lines.push(Line::from(Span::styled(
                        format!(
                            "    sent {} | delivered {} | failed {}",
                            b.sent, b.delivered, b.failed
                        ),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(screen.history_cursor));
        f.render_stateful_widget(list, area, &mut list_state);
    });
}

// ========================
// Chrome
// ========================

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(toast) = state.toasts.last() {
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        let bar = Paragraph::new(format!(" {} ", toast.text)).style(Style::default().fg(color));
        f.render_widget(bar, area);
        return;
    }

    let status = match state.input_mode {
        InputMode::Editing(_) => String::from(" Enter:submit | Esc:stop editing "),
        InputMode::Normal => format!(
            " Tab:next screen | r:refresh | ?:help | q:quit | {} ",
            state.base_url
        ),
    };
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MINI-APP CONSOLE - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Next / previous screen
   1-9                Jump to screen
   ↑ / ↓  (k / j)     Move in lists
   Enter / Esc        Open / close details
   r                  Refresh

 CUSTOMER
   c                  Complete open module
   p / s              Switch provider / pay
   y                  Show referral link

 ADMIN
   / / f              Search users / cycle score filter
   a / A              Next / previous audience
   e / m / b          Edit message / media path / add button
   x / B              Remove media / clear buttons
   s                  Send broadcast

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ui_events::AppMode;
    use crate::models::{AudienceCounts, PastBroadcast};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_every_tab_renders_while_loading() {
        for mode in [AppMode::Customer, AppMode::Admin] {
            for tab in mode.tabs() {
                let state = RenderState {
                    mode,
                    active_tab: *tab,
                    ..Default::default()
                };
                assert!(render(&state).contains("Loading"));
            }
        }
    }

    #[test]
    fn test_broadcast_screen_shows_counts_and_history() {
        let mut state = RenderState {
            mode: AppMode::Admin,
            active_tab: AppTab::Broadcast,
            ..Default::default()
        };
        state.queries.audience_counts = QueryState::Ready(AudienceCounts {
            all: 500,
            hot: 40,
            ..Default::default()
        });
        state.queries.broadcasts = QueryState::Ready(vec![PastBroadcast {
            id: 3,
            title: "Aksiya".into(),
            sent: 500,
            delivered: 480,
            failed: 20,
            status: "completed".into(),
            date: "2026-10-18".into(),
        }]);
        state.screens.broadcast.expanded = Some(3);
        let screen = render(&state);
        assert!(screen.contains("All users (500)"));
        assert!(screen.contains("Aksiya"));
        assert!(screen.contains("delivered 480"));
    }

    #[test]
    fn test_error_state_shows_detail() {
        let mut state = RenderState::default();
        state.queries.profile = QueryState::Failed("Not authorized".into());
        assert!(render(&state).contains("Not authorized"));
    }
}
