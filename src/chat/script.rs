//! The fixed six-step chat script.
//!
//! Each visitor message advances the step counter by one; the step whose
//! trigger equals the new count supplies the reply and names the lead field
//! the message fills in. Counts past the table get [`FALLBACK_REPLY`].

/// Lead field captured by a script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    /// Name plus an optional company mention.
    Name,
    ProjectType,
    ProjectDescription,
    Budget,
    Timeline,
    Email,
}

/// One row of the script table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    /// Visitor message count that selects this step.
    pub trigger: u32,
    /// Canned assistant reply.
    pub response: &'static str,
    /// Field filled from the triggering message.
    pub field: LeadField,
    /// Whether reaching this step submits the lead.
    pub submits_lead: bool,
}

/// Opening assistant message, asked before the first visitor message.
pub const WELCOME: &str = "Welcome to BlackPyramid. I'm your AI strategy assistant, here to \
understand your goals and connect you with the right specialists. To start, may I have your \
name and the company you're with?";

/// Reply for any message past the end of the script.
pub const FALLBACK_REPLY: &str = "Thank you for that information. Is there anything specific \
about our services you'd like to know more about?";

/// The script, ordered by trigger.
pub const SCRIPT: [ScriptStep; 6] = [
    ScriptStep {
        trigger: 1,
        response: "Thank you! It's a pleasure to connect. What challenge or opportunity brings \
you to us today? Are you looking to increase sales, automate processes, launch a new product, \
or something else?",
        field: LeadField::Name,
        submits_lead: false,
    },
    ScriptStep {
        trigger: 2,
        response: "That's a significant goal. Many of our most successful clients, from \
fast-growing startups to Fortune 500 companies, came to us with a similar challenge. Could you \
elaborate a bit more on what you've tried so far and what an ideal outcome would look like for \
you?",
        field: LeadField::ProjectType,
        submits_lead: false,
    },
    ScriptStep {
        trigger: 3,
        response: "Excellent. Understanding that vision is key. Based on what you've described, \
it seems like a strategic approach involving our AI automation and marketing solutions could be \
the most effective path. This is precisely the kind of challenge we specialize in solving. We've \
seen this approach deliver a 3x increase in qualified leads for clients in your sector.",
        field: LeadField::ProjectDescription,
        submits_lead: false,
    },
    ScriptStep {
        trigger: 4,
        response: "To ensure our human specialists can design a precise, high-ROI proposal for \
you, I just need a few more details. Do you have a specific timeline in mind for this project? \
And what's the primary metric you'll use to measure its success (e.g., revenue, cost savings, \
market share)?",
        field: LeadField::Budget,
        submits_lead: false,
    },
    ScriptStep {
        trigger: 5,
        response: "Perfect. We believe in delivering premium, high-performance solutions that \
generate a significant return on investment. Our pricing is structured to be competitive with \
the top-tier agencies in the world, while ensuring you receive demonstrable and superior value. \
What is the best email to send this summary to, along with the next steps for a detailed \
proposal from our team?",
        field: LeadField::Timeline,
        submits_lead: false,
    },
    ScriptStep {
        trigger: 6,
        response: "Excellent! I'm sending a summary of our conversation to your email now. \
You'll receive it shortly along with the next steps for a detailed proposal from our team. \
We're excited about the possibility of helping you achieve your goals. The BlackPyramid team \
will be in touch within 24 hours. Is there anything else you'd like to discuss?",
        field: LeadField::Email,
        submits_lead: true,
    },
];

/// Step triggered by the given visitor message count, if any.
pub fn step_for(count: u32) -> Option<&'static ScriptStep> {
    SCRIPT.iter().find(|step| step.trigger == count)
}

/// Reply shown after the given visitor message count.
pub fn reply_for(count: u32) -> &'static str {
    step_for(count).map_or(FALLBACK_REPLY, |step| step.response)
}
