//! Dashboard page document
//!
//! Assembles the full HTML page around the current slot contents. The
//! element ids and the body class are the page's contract with any script
//! or stylesheet that targets it.

use super::html::escape;
use super::mode::PageMode;
use super::slots::{Page, Slot};

/// Render the full dashboard page.
///
/// `refresh_secs` adds a meta refresh so a plain browser tab keeps up with
/// the poller; zero disables it.
pub fn render_document(page: &Page, mode: PageMode, refresh_secs: u64) -> String {
    let content = |slot: Slot| page.get(slot).to_html().into_owned();

    let refresh = if refresh_secs > 0 {
        format!(r#"<meta http-equiv="refresh" content="{}">"#, refresh_secs)
    } else {
        String::new()
    };

    let title = match mode {
        PageMode::Security => "SECURITY MONITOR",
        PageMode::Standard => "Мониторинг помещений",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
{refresh}
<title>{title}</title>
</head>
<body class="{body_class}">
<header>
<h1>{title}</h1>
<div class="stats">
<div class="stat"><span class="stat-label">Комнат</span> <span id="{total_rooms_id}">{total_rooms}</span></div>
<div class="stat"><span class="stat-label">Людей</span> <span id="{total_people_id}">{total_people}</span></div>
<div class="stat"><span class="stat-label">Обновлено</span> <span id="{last_update_id}">{last_update}</span></div>
</div>
</header>
<main>
<section class="rooms">
<h2>Комнаты</h2>
<div id="{rooms_id}">{rooms}</div>
</section>
<section class="visits">
<h2>Активные посещения <span id="{visits_count_id}">{visits_count}</span></h2>
<div id="{visits_id}">{visits}</div>
</section>
<section class="movements">
<h2>Перемещения</h2>
<table>
<thead><tr><th>Время</th><th>Человек</th><th>Откуда</th><th>Куда</th></tr></thead>
<tbody id="{movements_id}">{movements}</tbody>
</table>
</section>
<section class="group-movements">
<h2>Групповые перемещения</h2>
<table>
<thead><tr><th>Время</th><th>Группа</th><th>Участники</th><th>Откуда</th><th>Куда</th></tr></thead>
<tbody id="{groups_id}">{groups}</tbody>
</table>
</section>
</main>
</body>
</html>
"#,
        refresh = refresh,
        title = escape(title),
        body_class = mode.body_class(),
        total_rooms_id = Slot::TotalRooms.id(),
        total_rooms = content(Slot::TotalRooms),
        total_people_id = Slot::TotalPeople.id(),
        total_people = content(Slot::TotalPeople),
        last_update_id = Slot::LastUpdate.id(),
        last_update = content(Slot::LastUpdate),
        rooms_id = Slot::RoomsStatus.id(),
        rooms = content(Slot::RoomsStatus),
        visits_count_id = Slot::ActiveVisitsCount.id(),
        visits_count = content(Slot::ActiveVisitsCount),
        visits_id = Slot::ActiveVisitsList.id(),
        visits = content(Slot::ActiveVisitsList),
        movements_id = Slot::MovementsTable.id(),
        movements = content(Slot::MovementsTable),
        groups_id = Slot::GroupMovementsTable.id(),
        groups = content(Slot::GroupMovementsTable),
    )
}
