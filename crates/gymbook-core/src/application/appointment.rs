//! Appointment Application Service
//!
//! Calendar, schedule and booking flows with automatic event emission.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use super::booking_session::BookingSession;
use crate::domain::{
    Appointment, AppointmentRequest, DayAvailability, DomainEvent, HourSlot, HourlyAvailability,
    Machine, UserAppointments, UserId, WorkingHours,
};
use crate::error::BookingError;
use crate::event_bus::EventSender;
use crate::repository::AppointmentRepository;
use crate::service::{
    filter_users_by_date, mark_calendar, project_day, project_day_overview, DayMarking, HourOverview,
};

/// Application service for appointments
pub struct AppointmentAppService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    machines: Vec<Machine>,
    event_sender: EventSender,
}

impl AppointmentAppService {
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        machines: Vec<Machine>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            appointment_repo,
            machines,
            event_sender,
        }
    }

    /// Machines shown in the schedule, in display order
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Full/open marking of every day the backend lists
    pub async fn calendar(&self) -> Result<BTreeMap<NaiveDate, DayMarking>> {
        let days = self.appointment_repo.list_availability().await?;
        Ok(mark_calendar(&days))
    }

    /// Hour-by-machine grid of `date`
    ///
    /// A date the backend does not list is shown fully available over the
    /// default working hours.
    pub async fn day_schedule(&self, date: NaiveDate) -> Result<Vec<HourSlot>> {
        let days = self.appointment_repo.list_availability().await?;
        let (working_hours, hourly) = day_inputs(&days, date);
        Ok(project_day(&working_hours, &self.machines, &hourly))
    }

    /// Hour picker rows of `date` for `user_id`
    pub async fn day_overview(&self, user_id: UserId, date: NaiveDate) -> Result<Vec<HourOverview>> {
        let days = self.appointment_repo.list_availability().await?;
        let mine = self.appointment_repo.list_for_user(user_id).await?;
        let (working_hours, hourly) = day_inputs(&days, date);
        Ok(project_day_overview(working_hours.hours(), &hourly, &mine, date))
    }

    /// Open a booking session for one hour of `date`
    pub async fn start_booking(&self, date: NaiveDate, hour: u8) -> Result<BookingSession> {
        let schedule = self.day_schedule(date).await?;
        let slot = schedule
            .into_iter()
            .find(|slot| slot.hour == hour)
            .ok_or(BookingError::HourOutsideWorkingHours { hour })?;
        Ok(BookingSession::new(slot))
    }

    /// Submit a booking session for `date`
    ///
    /// The session is reset once the booking succeeds. When the backend
    /// rejects it the selection is put back so the user can retry.
    ///
    /// Emits: `AppointmentBooked`
    pub async fn book_machines(
        &self,
        user_id: UserId,
        date: NaiveDate,
        session: &mut BookingSession,
    ) -> Result<()> {
        let selection = session.clone();
        let booking = session.submit(|request| request)?;
        let hour = booking.hour;
        let machine_count = booking.machines.len();
        let request = AppointmentRequest::machines(user_id, date, booking);

        if let Err(e) = self.appointment_repo.book(&request).await {
            *session = selection;
            return Err(e);
        }

        info!(
            user_id = %user_id,
            %date,
            hour,
            machines = machine_count,
            "[AppointmentAppService] Booked machines"
        );

        self.event_sender.emit(DomainEvent::AppointmentBooked {
            date,
            hour,
            machine_count,
        });

        Ok(())
    }

    /// Book a plain hour of `date`
    ///
    /// Emits: `AppointmentBooked`
    pub async fn book_hour(&self, user_id: UserId, date: NaiveDate, hour: u8) -> Result<()> {
        let days = self.appointment_repo.list_availability().await?;
        let (working_hours, _) = day_inputs(&days, date);
        if !working_hours.contains(hour) {
            return Err(BookingError::HourOutsideWorkingHours { hour }.into());
        }

        let request = AppointmentRequest::hour(user_id, date, hour);
        self.appointment_repo.book(&request).await?;

        info!(user_id = %user_id, %date, hour, "[AppointmentAppService] Booked hour");

        self.event_sender.emit(DomainEvent::AppointmentBooked {
            date,
            hour,
            machine_count: 0,
        });

        Ok(())
    }

    /// Cancel an appointment that has not started yet
    ///
    /// Emits: `AppointmentCancelled`
    pub async fn cancel(&self, appointment: &Appointment, now: NaiveDateTime) -> Result<()> {
        if !appointment.can_cancel(now) {
            return Err(BookingError::AppointmentInPast {
                starts_at: appointment.starts_at(),
            }
            .into());
        }

        self.appointment_repo.cancel(appointment.id).await?;

        info!(appointment_id = %appointment.id, "[AppointmentAppService] Cancelled appointment");

        self.event_sender.emit(DomainEvent::AppointmentCancelled {
            appointment_id: appointment.id,
        });

        Ok(())
    }

    /// Change the bookable hours (trainer action)
    ///
    /// Emits: `WorkingHoursChanged`
    pub async fn set_working_hours(&self, start_hour: i64, end_hour: i64) -> Result<WorkingHours> {
        let hours = WorkingHours::new(start_hour, end_hour)?;
        self.appointment_repo.set_working_hours(&hours).await?;

        info!(
            start_hour = hours.start_hour(),
            end_hour = hours.end_hour(),
            "[AppointmentAppService] Working hours changed"
        );

        self.event_sender.emit(DomainEvent::WorkingHoursChanged {
            start_hour: hours.start_hour(),
            end_hour: hours.end_hour(),
        });

        Ok(hours)
    }

    /// Users with an appointment on `date` (trainer view)
    pub async fn users_on(&self, date: NaiveDate) -> Result<Vec<UserAppointments>> {
        let users = self.appointment_repo.list_users_with_appointments().await?;
        Ok(filter_users_by_date(&users, date))
    }
}

/// Working hours and hourly records of `date`
///
/// Every entry listed for the date is merged; a date the backend does not
/// list gets the default working hours and no records.
fn day_inputs(
    days: &[DayAvailability],
    date: NaiveDate,
) -> (WorkingHours, Vec<HourlyAvailability>) {
    match DayAvailability::merged(days, date) {
        Some(day) => (day.working_hours.unwrap_or_default(), day.hourly_availability),
        None => (WorkingHours::default(), Vec::new()),
    }
}
