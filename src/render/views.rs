//! View Builders
//!
//! Pure functions turning a fetched snapshot into the markup of one slot.
//! Every interpolated value goes through [`escape`]. The two page modes
//! render the same values with different markup.

use crate::format::{format_duration, people_label};
use crate::model::{GroupMovement, Movement, RoomsSnapshot, Visit};

use super::html::escape;
use super::mode::PageMode;

/// Column count of the movements table
pub const MOVEMENT_COLUMNS: usize = 4;

/// Column count of the group movements table
pub const GROUP_MOVEMENT_COLUMNS: usize = 5;

/// Aggregate counters shown in the page header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total_rooms: usize,
    pub total_people: u64,
}

impl Statistics {
    pub fn from_snapshot(snapshot: &RoomsSnapshot) -> Self {
        Self {
            total_rooms: snapshot.len(),
            total_people: snapshot.total_people(),
        }
    }
}

/// Room cards for the `rooms-status` slot
pub fn rooms_status(snapshot: &RoomsSnapshot, mode: PageMode) -> String {
    if snapshot.is_empty() {
        return r#"<div class="empty-state">Нет данных о комнатах</div>"#.to_string();
    }

    let mut html = String::new();
    for (name, status) in snapshot.iter() {
        let card = match mode {
            PageMode::Security => {
                let persons = if status.persons.is_empty() {
                    r#"<span class="no-subjects">NO SUBJECTS</span>"#.to_string()
                } else {
                    escape(&status.persons.join(", ")).into_owned()
                };
                format!(
                    concat!(
                        r#"<div class="room-card security">"#,
                        r#"<div class="room-header"><span class="room-name">{}</span>"#,
                        r#"<span class="room-count">{}</span></div>"#,
                        r#"<div class="room-persons">{}</div>"#,
                        "</div>"
                    ),
                    escape(name),
                    status.count,
                    persons
                )
            }
            PageMode::Standard => {
                let persons = if status.persons.is_empty() {
                    r#"<span class="no-persons">Пусто</span>"#.to_string()
                } else {
                    status
                        .persons
                        .iter()
                        .map(|person| format!(r#"<span class="person-badge">{}</span>"#, escape(person)))
                        .collect()
                };
                format!(
                    concat!(
                        r#"<div class="room-card">"#,
                        r#"<div class="room-name">{}</div>"#,
                        r#"<div class="room-count">{} {}</div>"#,
                        r#"<div class="room-persons">{}</div>"#,
                        "</div>"
                    ),
                    escape(name),
                    status.count,
                    people_label(status.count),
                    persons
                )
            }
        };
        html.push_str(&card);
    }
    html
}

/// Visit entries for the `active-visits-list` slot
pub fn active_visits(visits: &[Visit], mode: PageMode) -> String {
    if visits.is_empty() {
        let text = match mode {
            PageMode::Security => "NO ACTIVE SUBJECTS",
            PageMode::Standard => "Нет активных посещений",
        };
        return format!(r#"<div class="empty-state">{}</div>"#, text);
    }

    visits
        .iter()
        .map(|visit| {
            let person = escape(visit.person());
            let room = escape(visit.room());
            let duration = format_duration(visit.duration_min);
            let entered = escape(visit.entered_at());

            match mode {
                PageMode::Security => format!(
                    concat!(
                        r#"<div class="visit-item security">"#,
                        r#"<span class="visit-person">{}</span>"#,
                        r#"<span class="visit-room">{}</span>"#,
                        r#"<span class="visit-duration">{}</span>"#,
                        r#"<span class="visit-time">{}</span>"#,
                        "</div>"
                    ),
                    person, room, duration, entered
                ),
                PageMode::Standard => format!(
                    concat!(
                        r#"<div class="visit-card">"#,
                        r#"<div class="visit-person"><span class="person-badge">{}</span></div>"#,
                        r#"<div class="visit-details">"#,
                        r#"<span class="visit-room">{}</span>"#,
                        r#"<span class="visit-duration">{}</span>"#,
                        r#"<span class="visit-time">с {}</span>"#,
                        "</div></div>"
                    ),
                    person, room, duration, entered
                ),
            }
        })
        .collect()
}

/// Table rows for the `movements-table` slot
pub fn movements(movements: &[Movement], mode: PageMode) -> String {
    if movements.is_empty() {
        let text = match mode {
            PageMode::Security => "NO MOVEMENTS RECORDED",
            PageMode::Standard => "Нет перемещений",
        };
        return empty_row(MOVEMENT_COLUMNS, text);
    }

    movements
        .iter()
        .map(|movement| {
            let time = escape(movement.time_label());
            let person = escape(movement.person());
            let origin = escape(movement.origin());
            let destination = escape(movement.destination());

            match mode {
                PageMode::Security => format!(
                    r#"<tr class="security-row"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    time, person, origin, destination
                ),
                PageMode::Standard => format!(
                    concat!(
                        "<tr>",
                        r#"<td class="time-cell">{}</td>"#,
                        r#"<td><span class="person-badge">{}</span></td>"#,
                        r#"<td class="room-from">{}</td>"#,
                        r#"<td class="room-to">{}</td>"#,
                        "</tr>"
                    ),
                    time, person, origin, destination
                ),
            }
        })
        .collect()
}

/// Table rows for the `group-movements-table` slot
pub fn group_movements(movements: &[GroupMovement], mode: PageMode) -> String {
    if movements.is_empty() {
        let text = match mode {
            PageMode::Security => "NO GROUP MOVEMENTS",
            PageMode::Standard => "Нет групповых перемещений",
        };
        return empty_row(GROUP_MOVEMENT_COLUMNS, text);
    }

    movements
        .iter()
        .map(|movement| {
            let time = escape(movement.time_label());
            let group = escape(movement.group());
            let members = movement.members_joined();
            let origin = escape(movement.origin());
            let destination = escape(movement.destination());

            match mode {
                PageMode::Security => format!(
                    r#"<tr class="security-row"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    time,
                    group,
                    escape(&members),
                    origin,
                    destination
                ),
                PageMode::Standard => {
                    // The joined list is split again so members containing
                    // commas end up in separate badges
                    let badges: String = members
                        .split(',')
                        .map(|member| {
                            format!(r#"<span class="member-badge">{}</span>"#, escape(member.trim()))
                        })
                        .collect();
                    format!(
                        concat!(
                            "<tr>",
                            r#"<td class="time-cell">{}</td>"#,
                            r#"<td><span class="group-badge">{}</span></td>"#,
                            r#"<td class="group-members">{}</td>"#,
                            r#"<td class="room-from">{}</td>"#,
                            r#"<td class="room-to">{}</td>"#,
                            "</tr>"
                        ),
                        time, group, badges, origin, destination
                    )
                }
            }
        })
        .collect()
}

fn empty_row(columns: usize, text: &str) -> String {
    format!(
        r#"<tr><td colspan="{}" class="empty-state">{}</td></tr>"#,
        columns, text
    )
}
