//! Simulated calendar: tick index to day-of-year and time of day.

use std::rc::Rc;

use envgraph_core::{BuildContext, EngineError, EngineResult, ForwardPort, Module, PortRef};

/// Precomputed day-of-year, hour, minute and second ports for a run of
/// `total_days` days starting at `begin_day` (days past January 1st) with
/// a fixed tick length.
///
/// The tick length must divide a minute evenly, or be a whole number of
/// minutes dividing an hour evenly; an hour is the coarsest supported
/// step. Tick 0 is the first second of `begin_day`.
pub struct Calendar {
    label: String,
    begin_day: u32,
    total_days: u32,
    tick_seconds: u32,
    day_of_year: ForwardPort<u32>,
    hour: ForwardPort<u32>,
    minute: ForwardPort<u32>,
    second: ForwardPort<u32>,
}

impl Calendar {
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        begin_day: u32,
        total_days: u32,
        tick_seconds: u32,
    ) -> Self {
        Self {
            label: label.to_string(),
            begin_day,
            total_days,
            tick_seconds,
            day_of_year: ctx.forward(&format!("{label}.day_of_year")),
            hour: ctx.forward(&format!("{label}.hour")),
            minute: ctx.forward(&format!("{label}.minute")),
            second: ctx.forward(&format!("{label}.second")),
        }
    }

    /// Number of ticks in the run.
    pub fn total_ticks(&self) -> usize {
        self.total_days as usize * 86_400 / self.tick_seconds as usize
    }

    /// Day of year, 1-based (January 1st is 1).
    pub fn day_of_year(&self) -> PortRef<u32> {
        self.day_of_year.port()
    }

    pub fn hour(&self) -> PortRef<u32> {
        self.hour.port()
    }

    pub fn minute(&self) -> PortRef<u32> {
        self.minute.port()
    }

    pub fn second(&self) -> PortRef<u32> {
        self.second.port()
    }

    fn check_configuration(&self) -> EngineResult<()> {
        let ts = self.tick_seconds;
        let supported = if ts == 0 {
            false
        } else if ts < 60 {
            60 % ts == 0
        } else {
            ts <= 3600 && ts % 60 == 0 && 3600 % ts == 0
        };
        if !supported {
            return Err(EngineError::InvalidConfiguration(format!(
                "{}: tick of {ts} s must evenly divide a minute, or be whole \
                 minutes dividing an hour",
                self.label
            )));
        }
        if self.total_days == 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "{}: total_days must be positive",
                self.label
            )));
        }
        Ok(())
    }

    fn series(
        &self,
        ctx: &BuildContext,
        name: &str,
        data: Rc<Vec<u32>>,
        len: usize,
    ) -> PortRef<u32> {
        let label = format!("{}.{name}", self.label);
        let port_label = label.clone();
        ctx.from_fn(&label, move |t| {
            data.get(t).copied().ok_or(EngineError::TickOutOfRange {
                port: port_label.clone(),
                tick: t,
                len,
            })
        })
    }
}

impl Module for Calendar {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        self.check_configuration()?;

        let n = self.total_ticks();
        let per_day = 86_400 / self.tick_seconds as usize;
        let mut day = Vec::with_capacity(n);
        let mut hour = Vec::with_capacity(n);
        let mut minute = Vec::with_capacity(n);
        let mut second = Vec::with_capacity(n);
        for i in 0..n {
            let seconds_of_day = (i % per_day) as u32 * self.tick_seconds;
            day.push(self.begin_day + (i / per_day) as u32 + 1);
            hour.push(seconds_of_day / 3600);
            minute.push(seconds_of_day % 3600 / 60);
            second.push(seconds_of_day % 60);
        }

        self.day_of_year
            .bind(&self.series(ctx, "days", Rc::new(day), n))?;
        self.hour.bind(&self.series(ctx, "hours", Rc::new(hour), n))?;
        self.minute
            .bind(&self.series(ctx, "minutes", Rc::new(minute), n))?;
        self.second
            .bind(&self.series(ctx, "seconds", Rc::new(second), n))
    }
}
